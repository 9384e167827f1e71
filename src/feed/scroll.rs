/// Edge-triggered "last item came into view" detector.
///
/// The renderer reports the identity of the last rendered item and whether
/// it is visible. The trigger fires once per distinct item, on its first
/// transition into view, and re-arms when the last item changes. While the
/// next page is being fetched nothing is observed.
#[derive(Debug)]
pub struct ScrollTrigger<K> {
    observed: Option<K>,
    fired_for: Option<K>,
    was_visible: bool,
}

impl<K> Default for ScrollTrigger<K> {
    fn default() -> Self {
        Self {
            observed: None,
            fired_for: None,
            was_visible: false,
        }
    }
}

impl<K: PartialEq + Clone + std::fmt::Debug> ScrollTrigger<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind to the current last item, dropping the previous observation.
    pub fn observe(&mut self, last: Option<K>, is_fetching_next_page: bool) {
        if is_fetching_next_page {
            if self.observed.take().is_some() {
                tracing::trace!("Scroll trigger disconnected while next page loads");
            }
            self.was_visible = false;
            return;
        }

        if self.observed != last {
            tracing::trace!(last = ?last, "Scroll trigger observing new last item");
            self.observed = last;
            self.was_visible = false;
        }
    }

    /// Report the observed item's visibility for this frame.
    ///
    /// Returns `true` exactly when the caller should request the next page.
    pub fn on_visibility(&mut self, visible: bool) -> bool {
        let Some(target) = self.observed.as_ref() else {
            return false;
        };

        let entered = visible && !self.was_visible;
        self.was_visible = visible;

        if !entered || self.fired_for.as_ref() == Some(target) {
            return false;
        }

        self.fired_for = Some(target.clone());
        true
    }

    /// Forget everything, e.g. when the feed is replaced.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
