//! Camera controller for mouse and keyboard scene navigation
//!
//! Two examiner modes inspect an object by orbiting a center of interest; the
//! orientation is a quaternion about that center and the eye sits at a scalar
//! distance from it:
//!
//! 1. The virtual trackball, which imposes no particular "up" direction.
//! 2. The turntable, which keeps world +Z vertical and suits data with a
//!    natural up direction.
//!
//! A third, navigation mode flies a first-person camera described by a
//! position, a yaw angle in the XY plane and a pitch angle towards +Z, driven
//! by held movement keys and mouse-look.
//!
//! Both formulations are stored side by side so that switching modes never
//! loses the other one's state.

use std::f64::consts::SQRT_2;
use std::time::{Duration, Instant};

use cloudview_core::{
    axis_angle, direction_from_yaw_pitch, look_at, perspective, quaternion_from_direction,
    view_angles_rotation, Matrix3d, Matrix4d, Point2d, Point3d, Result, Transform3D,
    UnitQuaterniond, Vector2d, Vector3d, WORLD_UP,
};

use crate::config::{check_distance, check_field_of_view, CameraConfig, CameraMode};
use crate::events::{CameraChange, CameraObserver, ChangeFlags, ChangeNotifier};
use crate::navigation::{NavigationKey, NavigationKeys, SpeedTable};
use crate::viewport::Viewport;

/// Near and far clip distances in navigation mode (1 cm and 500 m).
pub const NAVIGATION_CLIP_RANGE: (f64, f64) = (0.01, 500.0);

/// Examiner clip planes as multiples of the eye to center distance.
pub const EXAMINER_NEAR_SCALE: f64 = 1e-2;
pub const EXAMINER_FAR_SCALE: f64 = 1e5;

/// Pitch limit for mouse-look, short of straight up or down.
const MAX_LOOK_PITCH: f64 = 89.0;

/// Interactive examiner/navigation camera
#[derive(Debug)]
pub struct InteractiveCamera {
    mode: CameraMode,
    /// Examiner variant to return to when leaving navigation
    last_examiner_mode: CameraMode,

    // Examiner state
    center: Point3d,
    rotation: UnitQuaterniond,
    distance: f64,

    // Navigation state
    position: Point3d,
    yaw: f64,
    pitch: f64,
    speeds: SpeedTable,
    last_update: Option<Instant>,

    // Projection state
    field_of_view: f64,
    viewport: Viewport,
    reverse_handedness: bool,

    // Interaction tuning
    trackball_radius: f64,
    zoom_speed: f64,
    max_navigation_step: Duration,
    look_sensitivity: f64,

    changes: ChangeNotifier,
}

impl InteractiveCamera {
    /// Create a camera with the default configuration
    pub fn new() -> Self {
        let config = CameraConfig::default();
        Self {
            mode: config.mode,
            last_examiner_mode: config.mode,
            center: Point3d::origin(),
            rotation: UnitQuaterniond::identity(),
            distance: config.distance,
            position: Point3d::origin(),
            yaw: 0.0,
            pitch: 0.0,
            speeds: SpeedTable::default(),
            last_update: None,
            field_of_view: config.field_of_view,
            viewport: Viewport::default(),
            reverse_handedness: config.reverse_handedness,
            trackball_radius: config.trackball_radius,
            zoom_speed: config.zoom_speed,
            max_navigation_step: Duration::from_secs_f64(config.max_navigation_step),
            look_sensitivity: config.look_sensitivity,
            changes: ChangeNotifier::default(),
        }
    }

    /// Create a camera from validated configuration
    pub fn from_config(config: &CameraConfig) -> Result<Self> {
        config.validate()?;
        let speeds = config.speeds()?;
        let max_navigation_step = config.navigation_step()?;
        let last_examiner_mode = if config.mode.is_examiner() {
            config.mode
        } else {
            CameraMode::Turntable
        };
        Ok(Self {
            mode: config.mode,
            last_examiner_mode,
            distance: config.distance,
            speeds,
            field_of_view: config.field_of_view,
            reverse_handedness: config.reverse_handedness,
            trackball_radius: config.trackball_radius,
            zoom_speed: config.zoom_speed,
            max_navigation_step,
            look_sensitivity: config.look_sensitivity,
            ..Self::new()
        })
    }

    //--------------------------------------------------------------------------
    // Matrices

    /// Projection from camera to clip coordinates.
    ///
    /// Examiner clip planes scale with the distance of interest, which keeps
    /// relative depth precision roughly constant while zooming at the cost of
    /// z-fighting for objects at similar depths far from the center.
    pub fn projection(&self) -> Matrix4d {
        let (near, far) = self.clip_planes();
        perspective(self.field_of_view, self.viewport.aspect_ratio(), near, far)
    }

    /// Near and far clip distances used by [`projection`](Self::projection)
    pub fn clip_planes(&self) -> (f64, f64) {
        if self.mode.is_examiner() {
            (
                EXAMINER_NEAR_SCALE * self.distance,
                EXAMINER_FAR_SCALE * self.distance,
            )
        } else {
            NAVIGATION_CLIP_RANGE
        }
    }

    /// View transformation from world to camera coordinates
    pub fn view(&self) -> Matrix4d {
        if self.mode.is_examiner() {
            Matrix4d::new_translation(&Vector3d::new(0.0, 0.0, -self.distance))
                * self.examiner_rotation()
                * Matrix4d::new_translation(&-self.center.coords)
        } else {
            let front = self.front();
            look_at(&self.position, &(self.position + front), &WORLD_UP)
        }
    }

    /// View rotation without any translation
    pub fn rotation_only(&self) -> Matrix4d {
        if self.mode.is_examiner() {
            self.examiner_rotation()
        } else {
            quaternion_from_direction(&self.front(), &WORLD_UP).to_homogeneous()
        }
    }

    /// Transformation from normalized device coordinates to pixels, with 0,0
    /// at the top left of the viewport and width,height at the bottom right
    pub fn viewport_transform(&self) -> Matrix4d {
        let vp = &self.viewport;
        Matrix4d::new_translation(&Vector3d::new(f64::from(vp.x()), f64::from(vp.y()), 0.0))
            * Matrix4d::new_nonuniform_scaling(&Vector3d::new(
                0.5 * f64::from(vp.width()),
                -0.5 * f64::from(vp.height()),
                1.0,
            ))
            * Matrix4d::new_translation(&Vector3d::new(1.0, -1.0, 0.0))
    }

    fn examiner_rotation(&self) -> Matrix4d {
        let rotation = self.rotation.to_homogeneous();
        if self.reverse_handedness {
            rotation * Matrix4d::new_nonuniform_scaling(&Vector3d::new(1.0, 1.0, -1.0))
        } else {
            rotation
        }
    }

    fn front(&self) -> Vector3d {
        direction_from_yaw_pitch(self.yaw, self.pitch)
    }

    /// Eye position implied by the examiner state
    fn examiner_eye(&self) -> Point3d {
        let mut offset = self.rotation.inverse() * Vector3d::new(0.0, 0.0, self.distance);
        if self.reverse_handedness {
            offset.z = -offset.z;
        }
        self.center + offset
    }

    //--------------------------------------------------------------------------
    // Accessors

    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    /// Center of interest in world coordinates
    pub fn center(&self) -> Point3d {
        self.center
    }

    /// Eye position in world coordinates.
    ///
    /// In examiner modes this is derived from center, rotation and distance.
    pub fn position(&self) -> Point3d {
        if self.mode.is_examiner() {
            self.examiner_eye()
        } else {
            self.position
        }
    }

    pub fn rotation(&self) -> UnitQuaterniond {
        self.rotation
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Navigation yaw in degrees
    pub fn yaw(&self) -> f64 {
        self.yaw
    }

    /// Navigation pitch in degrees
    pub fn pitch(&self) -> f64 {
        self.pitch
    }

    /// Current navigation speed in metres per second
    pub fn speed(&self) -> f64 {
        self.speeds.speed()
    }

    pub fn speed_mode(&self) -> usize {
        self.speeds.mode()
    }

    pub fn speed_table(&self) -> &SpeedTable {
        &self.speeds
    }

    pub fn field_of_view(&self) -> f64 {
        self.field_of_view
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn reverse_handedness(&self) -> bool {
        self.reverse_handedness
    }

    //--------------------------------------------------------------------------
    // Change notification

    /// Register an observer called synchronously after every change
    pub fn add_observer(&mut self, observer: impl CameraObserver + 'static) {
        self.changes.add(Box::new(observer));
    }

    /// Changes accumulated since the last call to [`take_changes`](Self::take_changes)
    pub fn changes(&self) -> ChangeFlags {
        self.changes.flags()
    }

    /// Return and clear the accumulated change flags
    pub fn take_changes(&mut self) -> ChangeFlags {
        self.changes.take()
    }

    fn view_changed(&mut self) {
        self.changes.notify(CameraChange::View);
    }

    fn projection_changed(&mut self) {
        self.changes.notify(CameraChange::Projection);
    }

    //--------------------------------------------------------------------------
    // Setters

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.view_changed();
        self.projection_changed();
    }

    /// Set the vertical field of view in degrees
    pub fn set_field_of_view(&mut self, fov: f64) -> Result<()> {
        check_field_of_view(fov)?;
        self.field_of_view = fov;
        self.projection_changed();
        Ok(())
    }

    /// Set the examiner center of interest.
    ///
    /// In examiner modes the navigation position follows the resulting eye, so
    /// that entering navigation mode afterwards starts from the current view.
    pub fn set_center(&mut self, center: Point3d) {
        self.center = center;
        if self.mode.is_examiner() {
            self.position = self.examiner_eye();
        }
        self.view_changed();
    }

    pub fn set_eye_to_center_distance(&mut self, distance: f64) -> Result<()> {
        check_distance(distance)?;
        self.distance = distance;
        self.view_changed();
        Ok(())
    }

    pub fn set_rotation(&mut self, rotation: UnitQuaterniond) {
        self.rotation = UnitQuaterniond::new_normalize(rotation.into_inner());
        self.view_changed();
    }

    /// Set the examiner rotation from a 3x3 rotation matrix
    pub fn set_rotation_matrix(&mut self, rotation: &Matrix3d) {
        self.set_rotation(UnitQuaterniond::from_matrix(rotation));
    }

    /// Set the examiner rotation from view angles in degrees
    pub fn set_view_angles(&mut self, yaw: f64, pitch: f64, roll: f64) {
        self.set_rotation(view_angles_rotation(yaw, pitch, roll));
    }

    /// Select trackball (true) or turntable (false) examiner interaction
    pub fn set_trackball_interaction(&mut self, trackball: bool) {
        self.set_mode(if trackball {
            CameraMode::Trackball
        } else {
            CameraMode::Turntable
        });
    }

    /// Switch interaction mode. Stored examiner and navigation state is left
    /// untouched.
    pub fn set_mode(&mut self, mode: CameraMode) {
        if mode == self.mode {
            return;
        }
        log::debug!("camera mode {:?} -> {:?}", self.mode, mode);
        if self.mode.is_examiner() {
            self.last_examiner_mode = self.mode;
        }
        self.mode = mode;
        self.view_changed();
        self.projection_changed();
    }

    /// Switch between navigation and the most recent examiner mode
    pub fn toggle_navigation(&mut self) {
        if self.mode.is_examiner() {
            self.set_mode(CameraMode::Navigation);
        } else {
            self.set_mode(self.last_examiner_mode);
        }
    }

    pub fn set_reverse_handedness(&mut self, reverse: bool) {
        self.reverse_handedness = reverse;
        self.view_changed();
    }

    /// Set the navigation position
    pub fn set_position(&mut self, position: Point3d) {
        self.position = position;
        self.view_changed();
    }

    /// Set the navigation yaw and pitch in degrees
    pub fn set_yaw_pitch(&mut self, yaw: f64, pitch: f64) {
        self.yaw = yaw;
        self.pitch = pitch;
        self.view_changed();
    }

    //--------------------------------------------------------------------------
    // Mouse interaction

    /// Grab and move a point in 3D space with the mouse.
    ///
    /// `point` is in world coordinates and `mouse_movement` is the pointer
    /// motion in pixels. When `zooming`, the point slides along the ray from
    /// the eye through it, scaled by `exp(dy)`; otherwise it moves parallel to
    /// the screen, keeping its depth.
    pub fn mouse_move_point(
        &self,
        point: &Point3d,
        mouse_movement: &Vector2d,
        zooming: bool,
    ) -> Result<Point3d> {
        let dx = 2.0 * mouse_movement.x / f64::from(self.viewport.width());
        let dy = -2.0 * mouse_movement.y / f64::from(self.viewport.height());
        if zooming {
            let view = Transform3D::from(self.view());
            let in_view = view.transform_point(point)?;
            view.inverse()?.transform_point(&(in_view * dy.exp()))
        } else {
            let view_proj = Transform3D::from(self.projection() * self.view());
            let ndc = view_proj.transform_point(point)? + Vector3d::new(dx, dy, 0.0);
            view_proj.inverse()?.transform_point(&ndc)
        }
    }

    /// Move the camera with a mouse drag from `prev` to `curr` (pixels).
    ///
    /// By default this rotates about the center using the trackball or
    /// turntable model; with `zoom` the eye moves exponentially towards or
    /// away from the center, which gives the same feel at every scale.
    pub fn mouse_drag(&mut self, prev: Point2d, curr: Point2d, zoom: bool) {
        if zoom {
            let dy = (curr.y - prev.y) / f64::from(self.viewport.height());
            self.distance *= (self.zoom_speed * dy).exp();
            log::trace!("zoom drag dy={dy:.4} distance={:.4}", self.distance);
        } else {
            self.rotation = if self.mode == CameraMode::Trackball {
                self.trackball_rotation(prev, curr) * self.rotation
            } else {
                // TODO: the turntable formula interleaves with the stored
                // rotation, so switching from trackball mid-session keeps any
                // accumulated roll. Decide whether to level it on switch.
                self.turntable_rotation(prev, curr, self.rotation)
            };
            self.rotation.renormalize();
            log::trace!("rotate drag {prev} -> {curr}");
        }
        self.view_changed();
    }

    /// Mouse-look for navigation mode: horizontal motion turns, vertical
    /// motion tilts. Pitch stops short of vertical.
    pub fn mouse_look(&mut self, prev: Point2d, curr: Point2d) {
        let delta = curr - prev;
        self.yaw = (self.yaw - self.look_sensitivity * delta.x).rem_euclid(360.0);
        self.pitch = (self.pitch - self.look_sensitivity * delta.y)
            .clamp(-MAX_LOOK_PITCH, MAX_LOOK_PITCH);
        self.view_changed();
    }

    /// Turntable rotation of `initial` for a drag from `prev` to `curr`.
    ///
    /// Vertical motion pitches about world X and horizontal motion yaws about
    /// world Z; both axes stay fixed so the view never rolls.
    pub(crate) fn turntable_rotation(
        &self,
        prev: Point2d,
        curr: Point2d,
        initial: UnitQuaterniond,
    ) -> UnitQuaterniond {
        let dx = 4.0 * (curr.x - prev.x) / f64::from(self.viewport.width());
        let dy = 4.0 * (curr.y - prev.y) / f64::from(self.viewport.height());
        let r1 = UnitQuaterniond::from_axis_angle(&Vector3d::x_axis(), dy);
        let r2 = UnitQuaterniond::from_axis_angle(&Vector3d::z_axis(), dx);
        r1 * initial * r2
    }

    /// Rotation of the virtual trackball for a drag from `prev` to `curr`.
    ///
    /// The rotation angle is twice the angle between the two trackball
    /// vectors. With that factor the composite rotation after moving the mouse
    /// around any closed path is exactly the identity, so the model returns to
    /// its original orientation when the pointer does.
    pub(crate) fn trackball_rotation(&self, prev: Point2d, curr: Point2d) -> UnitQuaterniond {
        let p1 = self.trackball_vector(prev, self.trackball_radius);
        let p2 = self.trackball_vector(curr, self.trackball_radius);
        let axis = p1.cross(&p2);
        let lengths = p1.norm() * p2.norm();
        if lengths == 0.0 {
            return UnitQuaterniond::identity();
        }
        let angle = 2.0 * (axis.norm() / lengths).clamp(-1.0, 1.0).asin();
        axis_angle(&axis, angle)
    }

    /// Position on the surface of a virtual trackball.
    ///
    /// The pointer is mapped to [-1, 1] across the viewport and projected
    /// orthogonally onto a sphere of radius `r` centred on the viewport. Past
    /// `r / sqrt(2)` the sphere is joined by a tangent cone, which keeps the
    /// projection defined everywhere and stays sensitive near the edges.
    pub(crate) fn trackball_vector(&self, pos: Point2d, r: f64) -> Vector3d {
        let center = self.viewport.center();
        let x = 2.0 * (pos.x - center.x) / f64::from(self.viewport.width());
        let y = -2.0 * (pos.y - center.y) / f64::from(self.viewport.height());
        let d = x.hypot(y);
        let z = if d < r / SQRT_2 {
            (r * r - d * d).sqrt()
        } else {
            r * SQRT_2 - d
        };
        Vector3d::new(x, y, z)
    }

    //--------------------------------------------------------------------------
    // Keyboard navigation

    pub fn navigate_faster(&mut self) {
        if self.speeds.faster() {
            log::debug!("navigation speed {} m/s", self.speeds.speed());
        }
    }

    pub fn navigate_slower(&mut self) {
        if self.speeds.slower() {
            log::debug!("navigation speed {} m/s", self.speeds.speed());
        }
    }

    /// Integrate navigation movement for the keys held at time `now`.
    ///
    /// The step is the time since the previous call, capped at the configured
    /// maximum so a stalled frame does not jump the camera; the first call only
    /// records the time. Afterwards the examiner state is pointed along the
    /// view direction one unit ahead of the eye.
    pub fn update_navigation(&mut self, keys: &NavigationKeys, now: Instant) {
        let elapsed = match self.last_update {
            Some(then) => now.saturating_duration_since(then).min(self.max_navigation_step),
            None => Duration::ZERO,
        };
        self.last_update = Some(now);
        self.step_navigation(keys, elapsed.as_secs_f64());
    }

    fn step_navigation(&mut self, keys: &NavigationKeys, seconds: f64) {
        let dir = self.front();
        // Horizontal speed should not change while also climbing or sinking.
        let mut front = dir;
        if keys.vertical() {
            front.z = 0.0;
        }
        // No strafing direction exists while looking straight up or down.
        let right = front
            .cross(&WORLD_UP)
            .try_normalize(1e-12)
            .unwrap_or_else(Vector3d::zeros);
        let step = seconds * self.speeds.speed();

        let moves = [
            (NavigationKey::Forward, front * step),
            (NavigationKey::Backward, -front * step),
            (NavigationKey::Left, -right * step),
            (NavigationKey::Right, right * step),
            (NavigationKey::Up, WORLD_UP * step * 0.5),
            (NavigationKey::Down, -WORLD_UP * step * 0.5),
        ];
        for (key, offset) in moves {
            if keys.contains(key) {
                self.position += offset;
            }
        }

        self.center = self.position + dir;
        self.distance = 1.0;
        self.rotation = quaternion_from_direction(&dir, &WORLD_UP);

        if !keys.is_empty() {
            self.view_changed();
        }
    }
}

impl Default for InteractiveCamera {
    fn default() -> Self {
        Self::new()
    }
}
