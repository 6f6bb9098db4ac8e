//! Chart-ready series derived from a simulation result and the current
//! selection. Everything here is a pure function of its inputs.

pub mod series;

pub use series::{
    collision_chart, format_throughput, handover_chart, per_chart, sinr_chart, throughput_chart,
    ChartState, ChartView, LineSeries,
};

use crate::model::SimulationResult;
use crate::presenter::SelectionState;

/// Every panel of the results dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub sinr: ChartState,
    pub throughput: ChartState,
    pub per: ChartState,
    pub collisions: ChartState,
    pub handovers: ChartState,
}

impl DashboardView {
    pub fn build(result: &SimulationResult, selection: &SelectionState) -> Self {
        Self {
            sinr: sinr_chart(result, selection),
            throughput: throughput_chart(result, selection),
            per: per_chart(result, selection),
            collisions: collision_chart(result, selection),
            handovers: handover_chart(result, selection, selection.access_point_count()),
        }
    }

    pub fn panels(&self) -> [&ChartState; 5] {
        [
            &self.sinr,
            &self.throughput,
            &self.per,
            &self.collisions,
            &self.handovers,
        ]
    }
}
