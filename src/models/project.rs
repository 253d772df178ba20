use super::{InitConfig, Junction, TempAdjustments};

/// Immutable inputs every timing computation needs besides the junction itself
#[derive(Debug, Clone, Copy)]
pub struct PlanContext<'a> {
    pub main_cycle: i64,
    pub temp: &'a TempAdjustments,
}

impl<'a> PlanContext<'a> {
    #[must_use]
    pub const fn new(main_cycle: i64, temp: &'a TempAdjustments) -> Self {
        Self { main_cycle, temp }
    }

    #[must_use]
    pub fn effective_cycle(&self, junction: &Junction) -> i64 {
        junction.effective_cycle(self.main_cycle)
    }
}

/// Session state: the junction chain, the shared main cycle and pending adjustments
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub main_cycle: i64,
    pub view_cycles: i64,
    pub junctions: Vec<Junction>,
    /// Rendering overlays, carried opaquely so saving keeps them
    pub overlays: Vec<serde_json::Value>,
    pub temp: TempAdjustments,
    pub config: InitConfig,
}

const DEFAULT_JUNCTION_IDS: [&str; 5] = ["A", "B", "C", "D", "E"];

impl Project {
    /// Build the default session described by the configuration
    #[must_use]
    pub fn from_config(config: &InitConfig) -> Self {
        let count = usize::try_from(config.junction_count.clamp(config.junction_count.default))
            .unwrap_or(0)
            .min(DEFAULT_JUNCTION_IDS.len());
        let junctions = DEFAULT_JUNCTION_IDS[..count]
            .iter()
            .map(|id| Junction::from_config(id, config))
            .collect();
        Self {
            main_cycle: config.main_cycle_time.clamp(config.main_cycle_time.default),
            view_cycles: config.plot.view_cycles.default,
            junctions,
            overlays: Vec::new(),
            temp: TempAdjustments::default(),
            config: config.clone(),
        }
    }

    #[must_use]
    pub fn context(&self) -> PlanContext<'_> {
        PlanContext::new(self.main_cycle, &self.temp)
    }

    #[must_use]
    pub fn junction(&self, id: &str) -> Option<&Junction> {
        self.junctions.iter().find(|j| j.id == id)
    }

    /// Journey time along the chain from junction `from` to junction `to` (by position)
    #[must_use]
    pub fn travel_time_between(&self, from: usize, to: usize) -> i64 {
        if from == to {
            return 0;
        }
        if to > from {
            self.junctions
                .iter()
                .skip(from)
                .take(to - from)
                .map(|j| j.travel_next)
                .sum()
        } else {
            self.junctions
                .iter()
                .skip(to + 1)
                .take(from - to)
                .map(|j| j.travel_prev)
                .sum()
        }
    }
}

impl Default for Project {
    fn default() -> Self {
        Self::from_config(&InitConfig::default())
    }
}
