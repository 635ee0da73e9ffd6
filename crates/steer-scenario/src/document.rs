//! Scenario Document Model
//!
//! In-memory snapshot of a scene: world bounds, obstacles, and agents with
//! their initial conditions, goal sequences, and optional recorded
//! trajectories. A document is assembled immediately before a write call
//! and is never mutated afterwards; nothing in this module performs I/O.

use serde::{Deserialize, Serialize};

use crate::geometry::{AxisAlignedBox, Vec3, WorldBounds};

/// Steering objective kind for a single goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    SeekStaticTarget,
    FleeStaticTarget,
    SeekDynamicTarget,
    FleeDynamicTarget,
    FlowStaticDirection,
    FlowDynamicDirection,
    Idle,
}

/// A single key/value steering parameter inside a behavior override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BehaviorParameter {
    pub key: String,
    pub value: String,
}

impl BehaviorParameter {
    /// Creates a new parameter.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Per-goal steering algorithm override.
///
/// A behavior with an empty algorithm name is treated as absent by the
/// writer, matching the historical format.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Behavior {
    /// Name of the steering algorithm to apply for this goal
    pub steering_algorithm: String,
    /// Algorithm parameters in insertion order
    #[serde(default)]
    pub parameters: Vec<BehaviorParameter>,
}

impl Behavior {
    /// Creates a behavior override for the named steering algorithm.
    pub fn new(steering_algorithm: impl Into<String>) -> Self {
        Self {
            steering_algorithm: steering_algorithm.into(),
            parameters: Vec::new(),
        }
    }

    /// Appends a parameter, preserving insertion order.
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.push(BehaviorParameter::new(key, value));
        self
    }
}

/// One steering objective within an agent's ordered goal sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalDescriptor {
    pub goal_type: GoalType,
    #[serde(default)]
    pub target_location: Vec3,
    #[serde(default)]
    pub target_direction: Vec3,
    #[serde(default)]
    pub desired_speed: f32,
    #[serde(default)]
    pub time_duration: f32,
    #[serde(default)]
    pub flow_type: String,
    #[serde(default)]
    pub target_is_random: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub behavior: Option<Behavior>,
}

impl GoalDescriptor {
    /// Creates a goal of the given type with neutral defaults.
    pub fn new(goal_type: GoalType) -> Self {
        Self {
            goal_type,
            target_location: Vec3::ZERO,
            target_direction: Vec3::ZERO,
            desired_speed: 0.0,
            time_duration: 0.0,
            flow_type: String::new(),
            target_is_random: false,
            behavior: None,
        }
    }

    /// Sets the target location.
    pub fn with_target_location(mut self, target: Vec3) -> Self {
        self.target_location = target;
        self
    }

    /// Sets the target direction.
    pub fn with_target_direction(mut self, direction: Vec3) -> Self {
        self.target_direction = direction;
        self
    }

    /// Sets the desired speed.
    pub fn with_desired_speed(mut self, speed: f32) -> Self {
        self.desired_speed = speed;
        self
    }

    /// Sets the time duration.
    pub fn with_time_duration(mut self, duration: f32) -> Self {
        self.time_duration = duration;
        self
    }

    /// Marks the target as randomly chosen.
    pub fn with_random_target(mut self) -> Self {
        self.target_is_random = true;
        self
    }

    /// Sets the behavior override.
    pub fn with_behavior(mut self, behavior: Behavior) -> Self {
        self.behavior = Some(behavior);
        self
    }
}

/// Initial conditions for one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentInitialConditions {
    pub name: String,
    pub radius: f32,
    pub position: Vec3,
    #[serde(default)]
    pub direction: Vec3,
    #[serde(default)]
    pub speed: f32,
    #[serde(default)]
    pub start_time: f32,
    pub goals: Vec<GoalDescriptor>,
}

impl AgentInitialConditions {
    /// Creates initial conditions for a named agent at a position.
    pub fn new(name: impl Into<String>, radius: f32, position: Vec3) -> Self {
        Self {
            name: name.into(),
            radius,
            position,
            direction: Vec3::ZERO,
            speed: 0.0,
            start_time: 0.0,
            goals: Vec::new(),
        }
    }

    /// Appends a goal to the goal sequence.
    pub fn with_goal(mut self, goal: GoalDescriptor) -> Self {
        self.goals.push(goal);
        self
    }

    /// Sets the initial facing direction.
    pub fn with_direction(mut self, direction: Vec3) -> Self {
        self.direction = direction;
        self
    }

    /// Sets the initial speed.
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    /// Sets the start time.
    pub fn with_start_time(mut self, start_time: f32) -> Self {
        self.start_time = start_time;
        self
    }
}

/// Static scene geometry, one of the three supported representations.
///
/// A circle is stored as its bounding box; the writer derives radius,
/// height, and center position at render time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum ObstacleVariant {
    /// Axis-aligned box obstacle
    Box { bounds: AxisAlignedBox },
    /// Circle obstacle, represented by its bounding box
    Circle { bounds: AxisAlignedBox },
    /// Polygon obstacle with vertices in original order (may be empty)
    Polygon { vertices: Vec<Vec3> },
}

/// One recorded position of a live agent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySample {
    pub time: f32,
    pub position: Vec3,
}

impl TrajectorySample {
    /// Creates a sample at the given time.
    pub fn new(time: f32, position: Vec3) -> Self {
        Self { time, position }
    }
}

/// An agent entry in a document: initial conditions plus an optional
/// recorded trajectory (present only for results-mode documents).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioAgent {
    pub initial_conditions: AgentInitialConditions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trajectory: Option<Vec<TrajectorySample>>,
}

impl ScenarioAgent {
    /// Creates an agent entry with no recorded trajectory.
    pub fn new(initial_conditions: AgentInitialConditions) -> Self {
        Self {
            initial_conditions,
            trajectory: None,
        }
    }

    /// Attaches a recorded trajectory.
    pub fn with_trajectory(mut self, trajectory: Vec<TrajectorySample>) -> Self {
        self.trajectory = Some(trajectory);
        self
    }
}

/// Complete in-memory snapshot of a scene to be rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioDocument {
    /// Test case name, emitted in the document header
    pub name: String,
    /// Optional world scale, emitted only by scale-aware write modes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f32>,
    /// World bounds block
    pub bounds: WorldBounds,
    /// Obstacles in render order
    #[serde(default)]
    pub obstacles: Vec<ObstacleVariant>,
    /// Agents in render order
    #[serde(default)]
    pub agents: Vec<ScenarioAgent>,
}

impl ScenarioDocument {
    /// Creates an empty document with a name and world bounds.
    pub fn new(name: impl Into<String>, bounds: WorldBounds) -> Self {
        Self {
            name: name.into(),
            scale: None,
            bounds,
            obstacles: Vec::new(),
            agents: Vec::new(),
        }
    }

    /// Appends an obstacle.
    pub fn add_obstacle(&mut self, obstacle: ObstacleVariant) {
        self.obstacles.push(obstacle);
    }

    /// Appends an agent.
    pub fn add_agent(&mut self, agent: ScenarioAgent) {
        self.agents.push(agent);
    }

    /// Number of agents in the document.
    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    /// Number of obstacles in the document.
    pub fn obstacle_count(&self) -> usize {
        self.obstacles.len()
    }
}
