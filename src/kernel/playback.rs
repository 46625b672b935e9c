//! Click-to-reveal preview over a compiled block list.
//!
//! A stack of frames supports drilling into choice branches; only the top
//! frame is revealed or rendered. Join markers are never shown: rendering
//! one raises `pending_join`, and the following render step consumes the flag
//! with exactly one extra advance so the next visible block is glued onto the
//! previous line.

use rustc_hash::FxHashSet;

use crate::models::AstBlock;

#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackFrame {
    blocks: Vec<AstBlock>,
    reveal_index: usize,
    rendered: usize,
    glued: FxHashSet<usize>,
    glue_carry: bool,
}

impl PlaybackFrame {
    fn new(blocks: Vec<AstBlock>, index: usize) -> Self {
        let reveal_index = index.min(blocks.len());
        Self {
            blocks,
            reveal_index,
            rendered: 0,
            glued: FxHashSet::default(),
            glue_carry: false,
        }
    }

    pub fn blocks(&self) -> &[AstBlock] {
        &self.blocks
    }

    pub fn reveal_index(&self) -> usize {
        self.reveal_index
    }

    pub fn is_finished(&self) -> bool {
        self.reveal_index == self.blocks.len()
    }

    fn reset(&mut self) {
        self.reveal_index = 0;
        self.rendered = 0;
        self.glued.clear();
        self.glue_carry = false;
    }
}

/// One visible line of the preview: a run of revealed blocks shown without
/// a break between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    pub blocks: Vec<usize>,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaybackState {
    frames: Vec<PlaybackFrame>,
    pending_join: bool,
}

impl PlaybackState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame(&self) -> Option<&PlaybackFrame> {
        self.frames.last()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn pending_join(&self) -> bool {
        self.pending_join
    }

    pub fn set_initial_blocks(&mut self, blocks: Vec<AstBlock>, index: usize) {
        self.frames = vec![PlaybackFrame::new(blocks, index)];
        self.pending_join = false;
    }

    pub fn clear(&mut self) -> bool {
        let changed = !self.frames.is_empty() || self.pending_join;
        self.frames.clear();
        self.pending_join = false;
        changed
    }

    /// Reveals up to `n` more blocks of the top frame; clamped at the end.
    pub fn advance(&mut self, n: usize) -> bool {
        let Some(frame) = self.frames.last_mut() else {
            return false;
        };
        if frame.is_finished() || n == 0 {
            return false;
        }
        frame.reveal_index = frame.reveal_index.saturating_add(n).min(frame.blocks.len());
        true
    }

    /// Hides the last revealed block. No-op at index 0.
    pub fn retreat(&mut self) -> bool {
        let Some(frame) = self.frames.last_mut() else {
            return false;
        };
        if frame.reveal_index == 0 {
            return false;
        }
        frame.reveal_index -= 1;
        frame.rendered = frame.rendered.min(frame.reveal_index);
        frame.glue_carry = false;
        self.pending_join = false;
        true
    }

    /// Collapses to the root frame and rewinds it.
    pub fn reset_to_first(&mut self) -> bool {
        if self.frames.is_empty() {
            return false;
        }
        self.frames.truncate(1);
        if let Some(root) = self.frames.first_mut() {
            root.reset();
        }
        self.pending_join = false;
        true
    }

    /// Rewinds only the top frame.
    pub fn reset_last(&mut self) -> bool {
        let Some(frame) = self.frames.last_mut() else {
            return false;
        };
        frame.reset();
        self.pending_join = false;
        true
    }

    /// Raising the flag also glues the next visible block of the top frame.
    pub fn set_pending_join(&mut self, pending: bool) {
        self.pending_join = pending;
        if let Some(frame) = self.frames.last_mut() {
            frame.glue_carry = pending;
        }
    }

    /// The next block a click would reveal.
    pub fn current_item(&self) -> Option<&AstBlock> {
        let frame = self.frames.last()?;
        frame.blocks.get(frame.reveal_index)
    }

    pub fn revealed_blocks(&self) -> &[AstBlock] {
        match self.frames.last() {
            Some(frame) => &frame.blocks[..frame.reveal_index],
            None => &[],
        }
    }

    /// Pushes the children of a revealed choice as a new frame.
    pub fn enter_choice(&mut self, block: usize, choice: usize) -> bool {
        let Some(frame) = self.frames.last() else {
            return false;
        };
        if block >= frame.reveal_index {
            return false;
        }
        let Some(children) = frame
            .blocks
            .get(block)
            .and_then(AstBlock::choices)
            .and_then(|choices| choices.get(choice))
            .map(|c| c.children.clone())
        else {
            return false;
        };
        self.frames.push(PlaybackFrame::new(children, 0));
        self.pending_join = false;
        true
    }

    pub fn exit_frame(&mut self) -> bool {
        if self.frames.len() <= 1 {
            return false;
        }
        self.frames.pop();
        self.pending_join = false;
        true
    }

    /// Processes newly revealed blocks of the top frame and returns the
    /// visible lines. May advance the frame when a join is pending.
    pub fn render_pass(&mut self) -> Vec<RenderedLine> {
        let Some(frame) = self.frames.last_mut() else {
            return Vec::new();
        };

        loop {
            while frame.rendered < frame.reveal_index {
                let index = frame.rendered;
                frame.rendered += 1;
                let block = &frame.blocks[index];
                if block.is_join_marker() {
                    self.pending_join = true;
                    frame.glue_carry = true;
                    continue;
                }
                if block.display_text().is_none() {
                    continue;
                }
                if frame.glue_carry {
                    frame.glued.insert(index);
                    frame.glue_carry = false;
                }
            }

            if !self.pending_join {
                break;
            }
            self.pending_join = false;
            if frame.is_finished() {
                break;
            }
            frame.reveal_index += 1;
            tracing::trace!(reveal_index = frame.reveal_index, "join consumed");
        }

        let mut lines: Vec<RenderedLine> = Vec::new();
        for (index, block) in frame.blocks[..frame.reveal_index].iter().enumerate() {
            if block.is_join_marker() {
                continue;
            }
            let Some(text) = block.display_text() else {
                continue;
            };
            match lines.last_mut() {
                Some(line) if frame.glued.contains(&index) => {
                    line.blocks.push(index);
                    line.text.push_str(&text);
                }
                _ => lines.push(RenderedLine {
                    blocks: vec![index],
                    text,
                }),
            }
        }
        lines
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/playback.rs"]
mod tests;
