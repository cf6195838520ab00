//! Coordinates renders whose sources finish decoding independently.
//!
//! A render waits for both sides, composes once, and publishes only if no newer request has
//! published first. Ordering is by request issuance, not by completion.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::assets::decode::{ImageSource, SourceImage};
use crate::foundation::core::Side;
use crate::foundation::error::PairframeResult;
use crate::model::{PairTransforms, TextOptions};
use crate::render::composer::{Compositor, FrameInputs};
use crate::render::surface::FrameRGBA;
use crate::render::target::RenderTarget;

/// Issued per render request; higher sequence numbers are newer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RenderTicket {
    seq: u64,
}

impl RenderTicket {
    pub fn seq(self) -> u64 {
        self.seq
    }
}

#[derive(Clone, Debug)]
pub enum RenderOutcome {
    /// The frame is now the latest result.
    Published(Arc<FrameRGBA>),
    /// A newer request was issued or already published; the result was dropped.
    Superseded,
}

impl RenderOutcome {
    pub fn frame(&self) -> Option<&Arc<FrameRGBA>> {
        match self {
            RenderOutcome::Published(f) => Some(f),
            RenderOutcome::Superseded => None,
        }
    }
}

#[derive(Default)]
struct Slot {
    seq: u64,
    frame: Option<Arc<FrameRGBA>>,
}

/// Last-writer-wins holder for one display slot (a preview pane or a thumbnail cell).
#[derive(Default)]
pub struct RenderCoordinator {
    issued: AtomicU64,
    slot: Mutex<Slot>,
}

impl RenderCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, superseding every earlier one.
    pub fn begin(&self) -> RenderTicket {
        let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        RenderTicket { seq }
    }

    /// Whether `ticket` is still the newest request issued.
    pub fn is_current(&self, ticket: RenderTicket) -> bool {
        self.issued.load(Ordering::SeqCst) == ticket.seq
    }

    /// Store `frame` unless a newer request has already published.
    pub fn publish(&self, ticket: RenderTicket, frame: FrameRGBA) -> RenderOutcome {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if ticket.seq <= slot.seq {
            tracing::debug!(seq = ticket.seq, latest = slot.seq, "drop stale frame");
            return RenderOutcome::Superseded;
        }
        let frame = Arc::new(frame);
        slot.seq = ticket.seq;
        slot.frame = Some(Arc::clone(&frame));
        RenderOutcome::Published(frame)
    }

    /// Most recently published frame.
    pub fn latest(&self) -> Option<Arc<FrameRGBA>> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .frame
            .clone()
    }

    /// Sequence of the most recently published frame, `0` if none.
    pub fn latest_seq(&self) -> u64 {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner).seq
    }

    /// Join both loads, then compose exactly once and publish.
    ///
    /// A failing side aborts the whole render with a side-tagged decode error; nothing is
    /// composed or published. When `ticket` has been superseded by the time both sides are
    /// ready, compositing is skipped.
    pub fn render<L, R, C>(
        &self,
        ticket: RenderTicket,
        load_left: L,
        load_right: R,
        compose: C,
    ) -> PairframeResult<RenderOutcome>
    where
        L: FnOnce() -> PairframeResult<SourceImage> + Send,
        R: FnOnce() -> PairframeResult<SourceImage> + Send,
        C: FnOnce(&SourceImage, &SourceImage) -> PairframeResult<FrameRGBA>,
    {
        let (left, right) = rayon::join(load_left, load_right);
        let left = left.map_err(|e| e.with_side(Side::Left))?;
        let right = right.map_err(|e| e.with_side(Side::Right))?;

        if !self.is_current(ticket) {
            tracing::debug!(seq = ticket.seq, "request superseded before compositing");
            return Ok(RenderOutcome::Superseded);
        }

        let frame = compose(&left, &right)?;
        Ok(self.publish(ticket, frame))
    }

    /// [`RenderCoordinator::render`] for a pair of image sources and a compositor.
    #[allow(clippy::too_many_arguments)]
    pub fn render_sources(
        &self,
        ticket: RenderTicket,
        compositor: &mut Compositor,
        left: &ImageSource,
        right: &ImageSource,
        transforms: PairTransforms,
        text: Option<&TextOptions>,
        target: RenderTarget,
    ) -> PairframeResult<RenderOutcome> {
        let scale = target.scale()?;
        self.render(
            ticket,
            || left.load(),
            || right.load(),
            |l, r| {
                let mut inputs = FrameInputs::new(l, r).with_transforms(transforms);
                inputs.text = text;
                compositor.compose(&inputs, scale)
            },
        )
    }
}
