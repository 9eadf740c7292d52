//! Per-station computation audit trail.
//!
//! Every phase of the analysis appends its calculation steps here so a report
//! can show how each number was derived, not just its final value. One trace
//! is owned by exactly one station's analysis run and is never shared.

use serde::{Deserialize, Serialize};

/// Analysis phase a calculation step belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TracePhase {
    Globals,
    RowVelocity,
    Centerline,
    HalfRadius,
    MassFlow,
    Momentum,
    Collapse,
}

impl TracePhase {
    pub fn label(&self) -> &'static str {
        match self {
            TracePhase::Globals => "Global parameters",
            TracePhase::RowVelocity => "Row velocities",
            TracePhase::Centerline => "Centerline velocity",
            TracePhase::HalfRadius => "Half-velocity radius",
            TracePhase::MassFlow => "Mass flow integration",
            TracePhase::Momentum => "Momentum flux integration",
            TracePhase::Collapse => "Similarity collapse",
        }
    }
}

/// Outcome of a single step: a number, or free text for non-numeric facts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StepResult {
    Value { value: f64 },
    Text { text: String },
}

/// One auditable calculation: what was computed, the equation used, the
/// substituted numeric values, the result, and its unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationStep {
    pub label: String,
    pub equation: String,
    pub substitution: String,
    pub result: StepResult,
    pub unit: String,
}

impl CalculationStep {
    pub fn value(
        label: impl Into<String>,
        equation: impl Into<String>,
        substitution: impl Into<String>,
        value: f64,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            equation: equation.into(),
            substitution: substitution.into(),
            result: StepResult::Value { value },
            unit: unit.into(),
        }
    }

    pub fn text(
        label: impl Into<String>,
        equation: impl Into<String>,
        substitution: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            equation: equation.into(),
            substitution: substitution.into(),
            result: StepResult::Text { text: text.into() },
            unit: String::new(),
        }
    }
}

/// Ordered, append-only record of one station's analysis.
///
/// When `keep_steps` is off, appended steps are discarded; warnings are
/// always retained.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trace {
    keep_steps: bool,
    pub globals: Vec<CalculationStep>,
    pub row_velocity: Vec<CalculationStep>,
    pub centerline: Vec<CalculationStep>,
    pub half_radius: Vec<CalculationStep>,
    pub mass_flow: Vec<CalculationStep>,
    pub momentum: Vec<CalculationStep>,
    pub collapse: Vec<CalculationStep>,
    pub warnings: Vec<String>,
}

impl Trace {
    pub fn new(keep_steps: bool) -> Self {
        Self {
            keep_steps,
            globals: Vec::new(),
            row_velocity: Vec::new(),
            centerline: Vec::new(),
            half_radius: Vec::new(),
            mass_flow: Vec::new(),
            momentum: Vec::new(),
            collapse: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn log(&mut self, phase: TracePhase, step: CalculationStep) {
        if !self.keep_steps {
            return;
        }
        self.steps_mut(phase).push(step);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn steps(&self, phase: TracePhase) -> &[CalculationStep] {
        match phase {
            TracePhase::Globals => &self.globals,
            TracePhase::RowVelocity => &self.row_velocity,
            TracePhase::Centerline => &self.centerline,
            TracePhase::HalfRadius => &self.half_radius,
            TracePhase::MassFlow => &self.mass_flow,
            TracePhase::Momentum => &self.momentum,
            TracePhase::Collapse => &self.collapse,
        }
    }

    /// All phases in analysis order, for report rendering.
    pub fn phases(&self) -> [(TracePhase, &[CalculationStep]); 7] {
        [
            (TracePhase::Globals, self.globals.as_slice()),
            (TracePhase::RowVelocity, self.row_velocity.as_slice()),
            (TracePhase::Centerline, self.centerline.as_slice()),
            (TracePhase::HalfRadius, self.half_radius.as_slice()),
            (TracePhase::MassFlow, self.mass_flow.as_slice()),
            (TracePhase::Momentum, self.momentum.as_slice()),
            (TracePhase::Collapse, self.collapse.as_slice()),
        ]
    }

    fn steps_mut(&mut self, phase: TracePhase) -> &mut Vec<CalculationStep> {
        match phase {
            TracePhase::Globals => &mut self.globals,
            TracePhase::RowVelocity => &mut self.row_velocity,
            TracePhase::Centerline => &mut self.centerline,
            TracePhase::HalfRadius => &mut self.half_radius,
            TracePhase::MassFlow => &mut self.mass_flow,
            TracePhase::Momentum => &mut self.momentum,
            TracePhase::Collapse => &mut self.collapse,
        }
    }
}
