//! Gesture session: the state machine gluing mapper, mask, rasterizer
//! and accumulator together across the lifecycle of a drag.
//!
//! A session is `Idle` until a pointer-down lands inside the viewport,
//! `Drawing` while samples accumulate, and resolves the whole stroke in
//! one synchronous [`merge`](crate::selection::SelectionAccumulator::merge)
//! on pointer-up before returning to `Idle`. Resolution is
//! instantaneous — there is no observable "resolving" state between
//! calls.
//!
//! Transitions are driven by discrete [`PointerEvent`] values rather
//! than toolkit callbacks, so any UI layer can feed the session from
//! its own dispatch mechanism.

use image::GrayImage;

use crate::mask::MaskStore;
use crate::selection::{MergeOutcome, SelectionAccumulator};
use crate::types::{Dimensions, EngineError, HandSide, Point, SelectionSet};
use crate::viewport::{self, ViewportRect};

/// Capability for resolving a hand side to its decoded anatomical mask.
///
/// Supplied by the caller; the engine itself performs no I/O. A loader
/// failure is not fatal — the session degrades to the accept-everything
/// mask mode and keeps working.
pub trait MaskLoader {
    /// Resolve and decode the mask resource for the given hand side.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::DecodeFailure`] (or any other engine
    /// error) when the resource cannot be produced.
    fn load_mask(&self, side: HandSide) -> Result<GrayImage, EngineError>;
}

/// A pointer event in display-space coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Button pressed: a gesture may start.
    Down(Point),
    /// Pointer moved while pressed.
    Move(Point),
    /// Button released: the gesture ends and the stroke resolves.
    Up,
}

/// Observable phase of the gesture lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GesturePhase {
    /// No active stroke; the selection may be queried or cleared.
    #[default]
    Idle,
    /// A stroke is being collected; samples append until pointer-up.
    Drawing,
}

/// Result handed back to the caller after each stroke resolution.
#[derive(Debug)]
pub struct SelectionUpdate {
    /// Why the resolution concluded the way it did.
    pub outcome: MergeOutcome,
    /// Snapshot of the selection after resolution (unchanged from
    /// before it unless the outcome is `Merged`), in normalized
    /// coordinates and row-major pixel order.
    pub selection: Vec<Point>,
    /// Centroid of the selection, or `None` when it is empty.
    pub centroid: Option<Point>,
}

impl SelectionUpdate {
    /// Whether the stroke was merged into the selection.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.outcome.is_merged()
    }
}

/// The engine's public entry point: one session per selection surface.
///
/// Owns the [`SelectionAccumulator`] and the [`MaskStore`] for the
/// active hand, collects the in-progress stroke, and exposes the
/// selection and centroid between gestures.
#[derive(Debug)]
pub struct SelectionSession {
    accumulator: SelectionAccumulator,
    mask: MaskStore,
    image: Dimensions,
    hand: HandSide,
    phase: GesturePhase,
    stroke: Vec<Point>,
}

impl SelectionSession {
    /// Create a session for the given hand, resolving its mask through
    /// `loader`.
    ///
    /// `image` is the hand photograph's size; the mask is expected to
    /// share it. A loader failure degrades the mask store instead of
    /// failing construction.
    pub fn new(hand: HandSide, image: Dimensions, loader: &dyn MaskLoader) -> Self {
        let mask = load_or_degrade(hand, loader);
        Self {
            accumulator: SelectionAccumulator::new(),
            mask,
            image,
            hand,
            phase: GesturePhase::default(),
            stroke: Vec::new(),
        }
    }

    /// The current gesture phase.
    #[must_use]
    pub const fn phase(&self) -> GesturePhase {
        self.phase
    }

    /// The active hand side.
    #[must_use]
    pub const fn hand(&self) -> HandSide {
        self.hand
    }

    /// The hand photograph's dimensions.
    #[must_use]
    pub const fn image_dimensions(&self) -> Dimensions {
        self.image
    }

    /// The mask store for the active hand (for degraded-mode and
    /// diagnostic queries).
    #[must_use]
    pub const fn mask(&self) -> &MaskStore {
        &self.mask
    }

    /// The current selection.
    #[must_use]
    pub const fn selection(&self) -> &SelectionSet {
        self.accumulator.selection()
    }

    /// Centroid of the current selection, or `None` when empty.
    #[must_use]
    pub fn centroid(&self) -> Option<Point> {
        self.accumulator.centroid()
    }

    /// The in-progress stroke's image-space samples (empty when idle).
    ///
    /// Callers render this as the live lasso outline during a drag.
    #[must_use]
    pub fn stroke_points(&self) -> &[Point] {
        &self.stroke
    }

    /// Feed one pointer event; returns a [`SelectionUpdate`] when the
    /// event resolved a stroke (i.e. on `Up` while drawing).
    pub fn handle_pointer(
        &mut self,
        event: PointerEvent,
        viewport: &ViewportRect,
    ) -> Option<SelectionUpdate> {
        match event {
            PointerEvent::Down(p) => {
                self.begin_stroke(p, viewport);
                None
            }
            PointerEvent::Move(p) => {
                self.extend_stroke(p, viewport);
                None
            }
            PointerEvent::Up => self.finish_stroke(),
        }
    }

    /// Start a stroke at a display-space position.
    ///
    /// Samples outside the viewport do not start a gesture; a `Down`
    /// while already drawing is ignored.
    pub fn begin_stroke(&mut self, display: Point, viewport: &ViewportRect) {
        if self.phase == GesturePhase::Drawing {
            return;
        }
        if let Some(p) = viewport::to_image_space(display, viewport, self.image) {
            self.stroke.clear();
            self.stroke.push(p);
            self.phase = GesturePhase::Drawing;
        }
    }

    /// Append a display-space sample to the in-progress stroke.
    ///
    /// Samples outside the viewport are dropped, not errors: the drag
    /// simply stops accumulating until it re-enters the image.
    pub fn extend_stroke(&mut self, display: Point, viewport: &ViewportRect) {
        if self.phase != GesturePhase::Drawing {
            return;
        }
        if let Some(p) = viewport::to_image_space(display, viewport, self.image) {
            self.stroke.push(p);
        }
    }

    /// End the gesture and resolve the collected stroke with exactly
    /// one merge, returning to `Idle` regardless of outcome.
    ///
    /// Returns `None` when no gesture was active.
    pub fn finish_stroke(&mut self) -> Option<SelectionUpdate> {
        if self.phase != GesturePhase::Drawing {
            return None;
        }
        let stroke = std::mem::take(&mut self.stroke);
        self.phase = GesturePhase::Idle;

        let outcome = self.accumulator.merge(&stroke, &self.mask, self.image);
        Some(self.update(outcome))
    }

    /// Discard an in-progress stroke without resolving it.
    ///
    /// Used when the caller abandons a gesture (window resize, mode
    /// switch); the selection and centroid are untouched.
    pub fn abandon_stroke(&mut self) {
        self.stroke.clear();
        self.phase = GesturePhase::Idle;
    }

    /// Reset the selection and centroid to empty/none.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::GestureInProgress`] when called while a
    /// stroke is being drawn; `clear` is valid only from `Idle`.
    pub fn clear(&mut self) -> Result<(), EngineError> {
        if self.phase == GesturePhase::Drawing {
            return Err(EngineError::GestureInProgress);
        }
        self.accumulator.clear();
        Ok(())
    }

    /// Switch the active hand: clears the selection and reloads the
    /// mask through `loader`.
    ///
    /// `image` is the new photograph's size. The selection is defined
    /// relative to one mask's geometry and cannot be reinterpreted
    /// against another, so the clear is unconditional — even when
    /// switching back to a previously used side. A loader failure
    /// degrades the mask store rather than failing the switch.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::GestureInProgress`] when called while a
    /// stroke is being drawn; hand switches are valid only from `Idle`.
    pub fn set_hand(
        &mut self,
        side: HandSide,
        image: Dimensions,
        loader: &dyn MaskLoader,
    ) -> Result<(), EngineError> {
        if self.phase == GesturePhase::Drawing {
            return Err(EngineError::GestureInProgress);
        }
        self.hand = side;
        self.image = image;
        self.mask = load_or_degrade(side, loader);
        self.accumulator.clear();
        Ok(())
    }

    /// Apply the accept-anyway fallback after a
    /// [`MergeOutcome::ProcessingError`]: the raw stroke replaces the
    /// selection without mask clipping.
    pub fn accept_fallback(&mut self, raw_stroke: &[Point]) -> SelectionUpdate {
        let dims = self.mask.dimensions().unwrap_or(self.image);
        self.accumulator.accept_raw_stroke(raw_stroke, dims);
        self.update(MergeOutcome::Merged)
    }

    /// The current selection mapped into display space for overlay
    /// rendering. The engine never owns a drawing surface; the caller
    /// composites these points itself.
    #[must_use]
    pub fn selection_in_display_space(&self, viewport: &ViewportRect) -> Vec<Point> {
        let w = f64::from(self.image.width);
        let h = f64::from(self.image.height);
        self.accumulator
            .selection()
            .points()
            .iter()
            .map(|p| {
                let image_point = Point::new(p.x * w, p.y * h);
                viewport::to_display_space(image_point, viewport, self.image)
            })
            .collect()
    }

    fn update(&self, outcome: MergeOutcome) -> SelectionUpdate {
        SelectionUpdate {
            outcome,
            selection: self.accumulator.selection().points().to_vec(),
            centroid: self.accumulator.centroid(),
        }
    }
}

fn load_or_degrade(side: HandSide, loader: &dyn MaskLoader) -> MaskStore {
    loader
        .load_mask(side)
        .map_or_else(|_| MaskStore::degraded(), MaskStore::from_image)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    /// Loader producing a 10x10 all-hand (all-dark) mask for either side.
    struct OpenLoader;

    impl MaskLoader for OpenLoader {
        fn load_mask(&self, _side: HandSide) -> Result<GrayImage, EngineError> {
            Ok(GrayImage::new(10, 10))
        }
    }

    /// Loader that always fails, forcing degraded mode.
    struct FailingLoader;

    impl MaskLoader for FailingLoader {
        fn load_mask(&self, side: HandSide) -> Result<GrayImage, EngineError> {
            Err(EngineError::DecodeFailure(format!(
                "no mask resource for {side}",
            )))
        }
    }

    fn dims(w: u32, h: u32) -> Dimensions {
        Dimensions::new(w, h)
    }

    /// Viewport rendering the 10x10 image 1:1 at the display origin.
    fn unit_viewport() -> ViewportRect {
        ViewportRect::fit(10.0, 10.0, dims(10, 10))
    }

    fn session() -> SelectionSession {
        SelectionSession::new(HandSide::Right, dims(10, 10), &OpenLoader)
    }

    /// Drag a closed square from (x0,y0) to (x1,y1) through pointer
    /// events and return the resolution.
    fn drag_square(
        s: &mut SelectionSession,
        viewport: &ViewportRect,
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
    ) -> SelectionUpdate {
        s.handle_pointer(PointerEvent::Down(Point::new(x0, y0)), viewport);
        for p in [
            Point::new(x0, y1),
            Point::new(x1, y1),
            Point::new(x1, y0),
        ] {
            s.handle_pointer(PointerEvent::Move(p), viewport);
        }
        s.handle_pointer(PointerEvent::Up, viewport).unwrap()
    }

    #[test]
    fn new_session_is_idle_and_empty() {
        let s = session();
        assert_eq!(s.phase(), GesturePhase::Idle);
        assert_eq!(s.hand(), HandSide::Right);
        assert!(s.selection().is_empty());
        assert!(s.centroid().is_none());
        assert!(!s.mask().is_degraded());
    }

    #[test]
    fn down_inside_viewport_starts_drawing() {
        let mut s = session();
        s.handle_pointer(PointerEvent::Down(Point::new(2.0, 2.0)), &unit_viewport());
        assert_eq!(s.phase(), GesturePhase::Drawing);
        assert_eq!(s.stroke_points().len(), 1);
    }

    #[test]
    fn down_outside_viewport_is_ignored() {
        let mut s = session();
        s.handle_pointer(
            PointerEvent::Down(Point::new(50.0, 50.0)),
            &unit_viewport(),
        );
        assert_eq!(s.phase(), GesturePhase::Idle);
        assert!(s.stroke_points().is_empty());
    }

    #[test]
    fn moves_outside_viewport_are_dropped() {
        let mut s = session();
        let viewport = unit_viewport();
        s.handle_pointer(PointerEvent::Down(Point::new(2.0, 2.0)), &viewport);
        s.handle_pointer(PointerEvent::Move(Point::new(50.0, 2.0)), &viewport);
        s.handle_pointer(PointerEvent::Move(Point::new(3.0, 2.0)), &viewport);
        assert_eq!(s.stroke_points().len(), 2);
    }

    #[test]
    fn move_while_idle_is_ignored() {
        let mut s = session();
        s.handle_pointer(PointerEvent::Move(Point::new(2.0, 2.0)), &unit_viewport());
        assert_eq!(s.phase(), GesturePhase::Idle);
        assert!(s.stroke_points().is_empty());
    }

    #[test]
    fn up_while_idle_yields_nothing() {
        let mut s = session();
        assert!(
            s.handle_pointer(PointerEvent::Up, &unit_viewport())
                .is_none()
        );
    }

    #[test]
    fn full_gesture_merges_and_returns_to_idle() {
        let mut s = session();
        let update = drag_square(&mut s, &unit_viewport(), 1.0, 1.0, 4.0, 4.0);
        assert!(update.is_success());
        assert_eq!(update.selection.len(), 9);
        let c = update.centroid.unwrap();
        assert!((c.x - 0.2).abs() < 1e-12);
        assert_eq!(s.phase(), GesturePhase::Idle);
        assert!(s.stroke_points().is_empty());
    }

    #[test]
    fn degenerate_gesture_resolves_to_no_intersection() {
        let mut s = session();
        let viewport = unit_viewport();
        s.handle_pointer(PointerEvent::Down(Point::new(2.0, 2.0)), &viewport);
        s.handle_pointer(PointerEvent::Move(Point::new(3.0, 2.0)), &viewport);
        let update = s.handle_pointer(PointerEvent::Up, &viewport).unwrap();
        assert!(!update.is_success());
        assert!(matches!(update.outcome, MergeOutcome::NoIntersection));
        assert!(s.selection().is_empty());
    }

    #[test]
    fn abandoning_a_stroke_preserves_selection() {
        let mut s = session();
        let viewport = unit_viewport();
        let update = drag_square(&mut s, &viewport, 1.0, 1.0, 4.0, 4.0);
        assert!(update.is_success());
        let before = s.selection().clone();

        s.handle_pointer(PointerEvent::Down(Point::new(5.0, 5.0)), &viewport);
        s.handle_pointer(PointerEvent::Move(Point::new(8.0, 5.0)), &viewport);
        s.abandon_stroke();
        assert_eq!(s.phase(), GesturePhase::Idle);
        assert_eq!(s.selection(), &before);
        // The abandoned stroke does not leak into the next gesture.
        assert!(s.stroke_points().is_empty());
    }

    #[test]
    fn successive_gestures_union() {
        let mut s = session();
        let viewport = unit_viewport();
        let first = drag_square(&mut s, &viewport, 0.0, 0.0, 5.0, 1.0);
        assert_eq!(first.selection.len(), 5);
        let second = drag_square(&mut s, &viewport, 6.0, 5.0, 9.0, 6.0);
        assert_eq!(second.selection.len(), 8);
        assert_eq!(s.selection().len(), 8);
    }

    #[test]
    fn clear_while_idle_empties_selection() {
        let mut s = session();
        drag_square(&mut s, &unit_viewport(), 1.0, 1.0, 4.0, 4.0);
        s.clear().unwrap();
        assert!(s.selection().is_empty());
        assert!(s.centroid().is_none());
    }

    #[test]
    fn clear_while_drawing_is_rejected() {
        let mut s = session();
        s.handle_pointer(PointerEvent::Down(Point::new(2.0, 2.0)), &unit_viewport());
        assert!(matches!(s.clear(), Err(EngineError::GestureInProgress)));
        // The gesture is still live.
        assert_eq!(s.phase(), GesturePhase::Drawing);
    }

    #[test]
    fn set_hand_clears_selection_and_reloads_mask() {
        let mut s = session();
        drag_square(&mut s, &unit_viewport(), 1.0, 1.0, 4.0, 4.0);
        assert!(!s.selection().is_empty());

        s.set_hand(HandSide::Left, dims(10, 10), &OpenLoader).unwrap();
        assert_eq!(s.hand(), HandSide::Left);
        assert!(s.selection().is_empty());
        assert!(s.centroid().is_none());
        assert!(!s.mask().is_degraded());
    }

    #[test]
    fn set_hand_while_drawing_is_rejected() {
        let mut s = session();
        s.handle_pointer(PointerEvent::Down(Point::new(2.0, 2.0)), &unit_viewport());
        let result = s.set_hand(HandSide::Left, dims(10, 10), &OpenLoader);
        assert!(matches!(result, Err(EngineError::GestureInProgress)));
        assert_eq!(s.hand(), HandSide::Right);
    }

    #[test]
    fn loader_failure_degrades_instead_of_failing() {
        let s = SelectionSession::new(HandSide::Right, dims(10, 10), &FailingLoader);
        assert!(s.mask().is_degraded());
    }

    #[test]
    fn degraded_session_accepts_strokes() {
        let mut s = SelectionSession::new(HandSide::Right, dims(10, 10), &FailingLoader);
        let update = drag_square(&mut s, &unit_viewport(), 1.0, 1.0, 4.0, 4.0);
        assert!(update.is_success());
        // Vertices pass through (four samples), normalized.
        assert_eq!(update.selection.len(), 4);
    }

    #[test]
    fn accept_fallback_replaces_selection() {
        let mut s = session();
        drag_square(&mut s, &unit_viewport(), 1.0, 1.0, 4.0, 4.0);
        assert_eq!(s.selection().len(), 9);

        let raw = vec![
            Point::new(5.0, 5.0),
            Point::new(7.0, 5.0),
            Point::new(7.0, 7.0),
        ];
        let update = s.accept_fallback(&raw);
        assert!(update.is_success());
        assert_eq!(update.selection.len(), 3);
        assert_eq!(s.selection().len(), 3);
    }

    #[test]
    fn selection_maps_back_to_display_space() {
        let mut s = session();
        // Display is 20x20, image 10x10: scale 2, no letterbox offset.
        let viewport = ViewportRect::fit(20.0, 20.0, dims(10, 10));
        let update = drag_square(&mut s, &viewport, 2.0, 2.0, 8.0, 8.0);
        assert!(update.is_success());

        let overlay = s.selection_in_display_space(&viewport);
        assert_eq!(overlay.len(), s.selection().len());
        for (display, normalized) in overlay.iter().zip(s.selection().points()) {
            // normalized * image dims * scale = display.
            assert!((display.x - normalized.x * 10.0 * 2.0).abs() < 1e-9);
            assert!((display.y - normalized.y * 10.0 * 2.0).abs() < 1e-9);
        }
    }

    #[test]
    fn switching_hands_between_merges_resets_state() {
        let mut s = session();
        let viewport = unit_viewport();
        drag_square(&mut s, &viewport, 1.0, 1.0, 4.0, 4.0);
        s.set_hand(HandSide::Left, dims(10, 10), &OpenLoader).unwrap();

        // The reset is immediate, independent of prior content.
        assert!(s.selection().is_empty());
        assert!(s.centroid().is_none());

        // A fresh merge on the new hand starts from scratch.
        let update = drag_square(&mut s, &viewport, 6.0, 5.0, 9.0, 6.0);
        assert_eq!(update.selection.len(), 3);
    }
}
