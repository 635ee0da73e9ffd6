//! Scenario documents and the SteerBench test-case writer.
//!
//! This crate contains the pure data model for a multi-agent steering
//! scenario (agents, goal sequences, obstacles, world bounds, optional
//! recorded trajectories) and a writer that renders a document into the
//! hierarchical SteerBench test-case format. It has no dependency on any
//! engine or driver; documents are built by a caller, written once, and
//! dropped.

pub mod document;
pub mod geometry;
pub mod writer;

// Re-export geometry types
pub use geometry::{AxisAlignedBox, Vec3, WorldBounds};

// Re-export document types
pub use document::{
    AgentInitialConditions, Behavior, BehaviorParameter, GoalDescriptor, GoalType,
    ObstacleVariant, ScenarioAgent, ScenarioDocument, TrajectorySample,
};

// Re-export writer types
pub use writer::{
    goal_tag, ObstacleDispatch, TestCaseWriter, WriteConfig, WriteError, SCHEMA_VERSION,
    TEST_CASE_EXTENSION,
};
