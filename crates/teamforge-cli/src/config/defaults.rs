use teamforge::engine::config::{BalanceMetric, DEFAULT_MAX_BALANCE_ITERATIONS};

pub struct DefaultsConfig {
    pub redistribute: bool,
    pub balance: bool,
    pub max_iterations: usize,
    pub metric: BalanceMetric,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            redistribute: true,
            balance: true,
            max_iterations: DEFAULT_MAX_BALANCE_ITERATIONS,
            metric: BalanceMetric::Score,
        }
    }
}
