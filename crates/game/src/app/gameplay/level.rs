use engine::{AssetError, AssetLoader, Rect};

/// One-way platforms: actors land on a platform's top edge when falling onto
/// it and pass through it from below.
#[derive(Debug, Clone, Default)]
pub(crate) struct Level {
    platforms: Vec<Rect>,
}

impl Level {
    pub(crate) fn new(platforms: Vec<Rect>) -> Self {
        Self { platforms }
    }

    pub(crate) fn load(
        assets: &mut dyn AssetLoader,
        platform_ids: &[&str],
    ) -> Result<Self, AssetError> {
        let platforms = platform_ids
            .iter()
            .map(|id| assets.load_rectangle(id))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(platforms))
    }

    pub(crate) fn platforms(&self) -> &[Rect] {
        &self.platforms
    }

    /// Top edge of the highest platform whose top `bounds` crossed this tick,
    /// given the actor's bottom edge before the move.
    pub(crate) fn landing_top(&self, bounds: Rect, previous_bottom: i32) -> Option<i32> {
        self.platforms
            .iter()
            .filter(|platform| platform.overlaps_horizontally(&bounds))
            .filter(|platform| previous_bottom <= platform.y && bounds.bottom() >= platform.y)
            .map(|platform| platform.y)
            .min()
    }

    pub(crate) fn supports(&self, bounds: Rect) -> bool {
        self.platforms
            .iter()
            .any(|platform| platform.y == bounds.bottom() && platform.overlaps_horizontally(&bounds))
    }
}
