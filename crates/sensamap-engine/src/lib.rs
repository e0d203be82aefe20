//! sensamap-engine: Area selection & anatomical-mask intersection (sans-IO).
//!
//! Turns freehand lasso strokes over a hand photograph into a
//! persistent, mask-constrained selection:
//!
//! pointer samples -> image-space conversion -> polygon fill ->
//! mask intersection -> pixel-granular union -> centroid.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! buffers and returns structured data. Widget state, rendering, file
//! dialogs and CSV writing all live in the application shell, which
//! drives a [`SelectionSession`] with discrete pointer events and
//! reads back the normalized point set and centroid.
//!
//! # Typical flow
//!
//! ```rust
//! use sensamap_engine::{
//!     Dimensions, EngineError, GrayImage, HandSide, MaskLoader, Point, PointerEvent,
//!     SelectionSession, ViewportRect,
//! };
//!
//! struct AllHand;
//!
//! impl MaskLoader for AllHand {
//!     fn load_mask(&self, _side: HandSide) -> Result<GrayImage, EngineError> {
//!         // A fully dark mask: the whole image is valid hand area.
//!         Ok(GrayImage::new(10, 10))
//!     }
//! }
//!
//! let image = Dimensions::new(10, 10);
//! let mut session = SelectionSession::new(HandSide::Right, image, &AllHand);
//! let viewport = ViewportRect::fit(10.0, 10.0, image);
//!
//! session.handle_pointer(PointerEvent::Down(Point::new(1.0, 1.0)), &viewport);
//! for p in [Point::new(1.0, 4.0), Point::new(4.0, 4.0), Point::new(4.0, 1.0)] {
//!     session.handle_pointer(PointerEvent::Move(p), &viewport);
//! }
//! let update = session.handle_pointer(PointerEvent::Up, &viewport);
//! assert!(update.is_some_and(|u| u.is_success()));
//! assert!(session.centroid().is_some());
//! ```

pub mod mask;
pub mod raster;
pub mod selection;
pub mod session;
pub mod types;
pub mod viewport;

pub use mask::{BACKGROUND_THRESHOLD, HAND_THRESHOLD, MaskStats, MaskStore};
pub use selection::{MergeOutcome, SelectionAccumulator};
pub use session::{
    GesturePhase, MaskLoader, PointerEvent, SelectionSession, SelectionUpdate,
};
pub use types::{Dimensions, EngineError, GrayImage, HandSide, Point, SelectionSet};
pub use viewport::{ViewportRect, to_display_space, to_image_space};
