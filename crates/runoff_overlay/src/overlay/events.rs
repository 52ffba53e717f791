//! Event types and sinks for observing overlay transforms.
//!
//! [`OverlayEvent`]s are emitted by
//! [`crate::overlay::OverlayTransformer::transform_with_events`] for every placemark it
//! recolors or skips, followed by one [`OverlayEvent::TransformFinished`].
use crate::color::ChannelValue;
use crate::landuse::LandUseClass;

/// Why a placemark kept its original color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The placemark has no class attribute.
    MissingClass,
    /// The class attribute does not name a known land-use class.
    UnknownClass,
    /// The class is known but the settings carry no coefficient for it.
    NoCoefficient,
    /// No `Style/PolyStyle/color` element below the placemark.
    NoColorElement,
}

/// Describes events emitted while transforming an overlay.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayEvent {
    /// A placemark's color text was replaced.
    PlacemarkRecolored {
        /// Zero-based index of the placemark in document order.
        index: usize,
        class: LandUseClass,
        coefficient: f64,
        channel: ChannelValue,
        /// The new color text.
        color: String,
    },

    /// A placemark was left untouched.
    PlacemarkSkipped {
        index: usize,
        /// Raw class attribute, if present.
        class: Option<String>,
        reason: SkipReason,
    },

    /// Emitted once after the document was written.
    TransformFinished { summary: TransformSummary },
}

/// Counts for a finished transform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformSummary {
    pub placemarks: usize,
    pub recolored: usize,
    pub skipped: usize,
}

/// A generic event sink that accepts [`OverlayEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: OverlayEvent);
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: OverlayEvent) {}
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(OverlayEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(OverlayEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(OverlayEvent),
{
    #[inline]
    fn send(&mut self, event: OverlayEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects all events in a `Vec`.
#[derive(Default)]
pub struct VecSink {
    events: Vec<OverlayEvent>,
}

impl VecSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn into_inner(self) -> Vec<OverlayEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[OverlayEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: OverlayEvent) {
        self.events.push(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    #[inline]
    fn send(&mut self, event: OverlayEvent) {
        (**self).send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finished() -> OverlayEvent {
        OverlayEvent::TransformFinished {
            summary: TransformSummary::default(),
        }
    }

    #[test]
    fn vec_sink_collects_in_order() {
        let mut sink = VecSink::new();
        sink.send(OverlayEvent::PlacemarkSkipped {
            index: 0,
            class: None,
            reason: SkipReason::MissingClass,
        });
        sink.send(finished());
        assert_eq!(sink.len(), 2);
        assert!(matches!(
            sink.as_slice()[1],
            OverlayEvent::TransformFinished { .. }
        ));
    }

    #[test]
    fn fn_sink_forwards_events() {
        let mut count = 0;
        {
            let mut sink = FnSink::new(|_| count += 1);
            sink.send(finished());
            sink.send(finished());
        }
        assert_eq!(count, 2);
    }

    #[test]
    fn mutable_references_forward() {
        fn emit<S: EventSink>(mut sink: S) {
            sink.send(finished());
        }

        let mut inner = VecSink::new();
        emit(&mut inner);
        assert_eq!(inner.into_inner().len(), 1);
    }
}
