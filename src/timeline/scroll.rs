use std::collections::HashMap;

/// Name of a scrollable panel taking part in synchronisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PanelId(pub &'static str);

/// Keeps any number of panels on one shared scroll offset along one axis.
///
/// Only the source panel (the timeline body) drives the offset; every other
/// registered panel follows it.
#[derive(Debug, Clone)]
pub struct ScrollSync {
    source: PanelId,
    offset: f32,
    /// Offset each follower was last set to.
    followers: HashMap<PanelId, f32>,
}

impl ScrollSync {
    pub fn new(source: PanelId) -> Self {
        Self {
            source,
            offset: 0.0,
            followers: HashMap::new(),
        }
    }

    pub fn with_follower(mut self, panel: PanelId) -> Self {
        self.register(panel);
        self
    }

    /// Add a follower. It is out of date until it first adopts the offset.
    pub fn register(&mut self, panel: PanelId) {
        if panel != self.source {
            self.followers.insert(panel, f32::NAN);
        }
    }

    pub fn source(&self) -> PanelId {
        self.source
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Record a scroll event. Events from panels other than the source and
    /// non-finite offsets are ignored; negative offsets clamp to zero.
    /// Returns whether the shared offset changed.
    pub fn on_scroll(&mut self, from: PanelId, offset: f32) -> bool {
        if from != self.source || !offset.is_finite() {
            return false;
        }
        let offset = offset.max(0.0);
        if offset == self.offset {
            return false;
        }
        self.offset = offset;
        true
    }

    /// The offset `panel` has to adopt, if it is a follower that is behind.
    pub fn pending(&self, panel: PanelId) -> Option<f32> {
        match self.followers.get(&panel) {
            Some(applied) if *applied != self.offset => Some(self.offset),
            _ => None,
        }
    }

    pub fn mark_applied(&mut self, panel: PanelId, offset: f32) {
        if let Some(applied) = self.followers.get_mut(&panel) {
            *applied = offset;
        }
    }

    /// Push the shared offset to every follower that is behind.
    pub fn sync(&mut self, mut apply: impl FnMut(PanelId, f32)) {
        let offset = self.offset;
        for (panel, applied) in self.followers.iter_mut() {
            if *applied != offset {
                apply(*panel, offset);
                *applied = offset;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: PanelId = PanelId("body");
    const HEADER: PanelId = PanelId("header");
    const MINIMAP: PanelId = PanelId("minimap");

    #[test]
    fn followers_adopt_the_source_offset() {
        let mut sync = ScrollSync::new(BODY).with_follower(HEADER).with_follower(MINIMAP);
        assert_eq!(sync.pending(HEADER), Some(0.0));

        assert!(sync.on_scroll(BODY, 240.0));
        let mut applied = Vec::new();
        sync.sync(|panel, offset| applied.push((panel, offset)));
        applied.sort_by_key(|(panel, _)| panel.0);
        assert_eq!(applied, vec![(HEADER, 240.0), (MINIMAP, 240.0)]);

        assert_eq!(sync.pending(HEADER), None);
        let mut again = 0;
        sync.sync(|_, _| again += 1);
        assert_eq!(again, 0);
    }

    #[test]
    fn only_the_source_drives_the_offset() {
        let mut sync = ScrollSync::new(BODY).with_follower(HEADER);
        assert!(!sync.on_scroll(HEADER, 90.0));
        assert_eq!(sync.offset(), 0.0);
        assert!(!sync.on_scroll(BODY, f32::NAN));
        assert!(!sync.on_scroll(BODY, -5.0));
        assert_eq!(sync.offset(), 0.0);
    }

    #[test]
    fn mark_applied_clears_pending() {
        let mut sync = ScrollSync::new(BODY).with_follower(HEADER);
        sync.on_scroll(BODY, 12.5);
        assert_eq!(sync.pending(HEADER), Some(12.5));
        sync.mark_applied(HEADER, 12.5);
        assert_eq!(sync.pending(HEADER), None);
        assert_eq!(sync.pending(BODY), None);
    }
}
