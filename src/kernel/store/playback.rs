use crate::kernel::Action;

impl super::Store {
    pub(super) fn reduce_playback_action(&mut self, action: Action) -> super::DispatchResult {
        let playback = &mut self.state.playback;
        let changed = match action {
            Action::PlaybackAdvance(n) => playback.advance(n),
            Action::PlaybackRetreat => playback.retreat(),
            Action::PlaybackRestart => playback.reset_to_first(),
            Action::PlaybackResetLast => playback.reset_last(),
            Action::PlaybackSetPendingJoin(pending) => {
                let changed = playback.pending_join() != pending;
                playback.set_pending_join(pending);
                changed
            }
            Action::PlaybackEnterChoice { block, choice } => playback.enter_choice(block, choice),
            Action::PlaybackExitFrame => playback.exit_frame(),
            Action::PlaybackRender => false,
            _ => return super::DispatchResult::changed(false),
        };
        let rendered = self.refresh_preview();
        super::DispatchResult::changed(changed || rendered)
    }

    /// Runs a render pass and stores the visible lines.
    pub(super) fn refresh_preview(&mut self) -> bool {
        let before = self
            .state
            .playback
            .frame()
            .map(|f| (self.state.playback.depth(), f.reveal_index()));
        let lines = self.state.playback.render_pass();
        let after = self
            .state
            .playback
            .frame()
            .map(|f| (self.state.playback.depth(), f.reveal_index()));
        if lines == self.state.preview && before == after {
            return false;
        }
        self.state.preview = lines;
        true
    }

    /// Restarts playback over the active file's compiled blocks, or clears it
    /// when there is nothing compiled to show.
    pub(super) fn sync_playback(&mut self) {
        let blocks = self
            .state
            .active_file()
            .and_then(|file| self.state.compiled_blocks(file))
            .map(<[_]>::to_vec);
        match blocks {
            Some(blocks) => self.state.playback.set_initial_blocks(blocks, 0),
            None => {
                self.state.playback.clear();
            }
        }
        self.refresh_preview();
    }
}
