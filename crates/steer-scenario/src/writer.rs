//! SteerBench Test-Case Writer
//!
//! Renders a [`ScenarioDocument`] into the hierarchical SteerBench XML
//! format in one deterministic pass. The four historical write variants
//! (minimal, generic, extended, results) are the four presets of
//! [`WriteConfig`]; they share a single renderer parameterized by obstacle
//! dispatch policy and the trajectory/scale flags.
//!
//! All floats are emitted with one uniform fixed precision, matching the
//! `%f` formatting of the original writer. No value validation is
//! performed: negative radii, degenerate boxes, and empty strings pass
//! through unchanged.

use std::fs::File;
use std::io::{self, BufWriter, Write};

use serde::{Deserialize, Serialize};

use crate::document::{
    GoalDescriptor, GoalType, ObstacleVariant, ScenarioAgent, ScenarioDocument,
};
use crate::geometry::AxisAlignedBox;

/// Extension appended to every destination base name.
pub const TEST_CASE_EXTENSION: &str = ".xml";

/// Schema version emitted in the document header.
pub const SCHEMA_VERSION: &str = "1.0";

const HEADER_COMMENT: &str = "<!--\n  Generated test case.\n  See license.txt for complete license.\n-->";

const ROOT_OPEN: &str = "<SteerBenchTestCase xmlns=\"http://www.magix.ucla.edu/steerbench\"\n\
\t\txmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\"\n\
\t\txsi:schemaLocation=\"http://www.magix.ucla.edu/steerbench\n\
\t\t\t\tTestCaseSchema.xsd\">";

/// Obstacle dispatch policy of a write mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObstacleDispatch {
    /// Every obstacle must be a box; anything else is a fatal assertion.
    BoxOnly,
    /// Polygons render as polygons, everything else renders as a box.
    BoxPolygon,
    /// Polygons, circles, and boxes are distinguished.
    BoxPolygonCircle,
}

/// Write-mode configuration for one render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteConfig {
    pub obstacle_dispatch: ObstacleDispatch,
    pub include_trajectories: bool,
    pub include_scale: bool,
}

impl WriteConfig {
    /// Minimal mode: box obstacles only, no trajectories, no scale.
    pub fn minimal() -> Self {
        Self {
            obstacle_dispatch: ObstacleDispatch::BoxOnly,
            include_trajectories: false,
            include_scale: false,
        }
    }

    /// Generic mode: boxes and polygons, no trajectories, no scale.
    pub fn generic() -> Self {
        Self {
            obstacle_dispatch: ObstacleDispatch::BoxPolygon,
            include_trajectories: false,
            include_scale: false,
        }
    }

    /// Extended mode: all obstacle kinds plus the header scale field.
    pub fn extended() -> Self {
        Self {
            obstacle_dispatch: ObstacleDispatch::BoxPolygonCircle,
            include_trajectories: false,
            include_scale: true,
        }
    }

    /// Results mode: extended mode plus per-agent recorded trajectories.
    pub fn results() -> Self {
        Self {
            obstacle_dispatch: ObstacleDispatch::BoxPolygonCircle,
            include_trajectories: true,
            include_scale: true,
        }
    }
}

/// Maps a goal type to its output tag name.
///
/// The mapping is total. `Idle` maps to `"seekStaticTarget"`: the original
/// writer's switch statement had no break before its default arm, so idle
/// goals were always written with the default tag, and downstream readers
/// of existing result files expect that tag. Kept as documented behavior.
pub fn goal_tag(goal_type: GoalType) -> &'static str {
    match goal_type {
        GoalType::SeekStaticTarget => "seekStaticTarget",
        GoalType::FleeStaticTarget => "fleeStaticTarget",
        GoalType::SeekDynamicTarget => "seekDynamicTarget",
        GoalType::FleeDynamicTarget => "fleeDynamicTarget",
        GoalType::FlowStaticDirection => "flowStaticDirection",
        GoalType::FlowDynamicDirection => "flowDynamicDirection",
        GoalType::Idle => "seekStaticTarget",
    }
}

/// Errors that can occur while writing a test case.
#[derive(Debug)]
pub enum WriteError {
    /// The destination could not be opened or written
    Io(io::Error),
    /// Trajectory output was requested but an agent has no recorded trajectory
    MissingTrajectory {
        /// Name of the agent without a trajectory
        agent: String,
    },
}

impl std::fmt::Display for WriteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WriteError::Io(e) => write!(f, "I/O error: {}", e),
            WriteError::MissingTrajectory { agent } => {
                write!(f, "agent '{}' has no recorded trajectory", agent)
            }
        }
    }
}

impl std::error::Error for WriteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WriteError::Io(e) => Some(e),
            WriteError::MissingTrajectory { .. } => None,
        }
    }
}

impl From<io::Error> for WriteError {
    fn from(e: io::Error) -> Self {
        WriteError::Io(e)
    }
}

/// One-shot test-case writer.
///
/// The writer holds no state across calls except the name of the most
/// recently written document; it can be reused for any number of writes
/// with different destinations and configurations.
#[derive(Debug, Default)]
pub struct TestCaseWriter {
    test_case_name: String,
}

impl TestCaseWriter {
    /// Creates a writer with an empty test-case name.
    pub fn new() -> Self {
        Self::default()
    }

    /// Name used for the header of the most recent render.
    pub fn last_test_case_name(&self) -> &str {
        &self.test_case_name
    }

    /// Writes a document to `destination` + `.xml`.
    ///
    /// If the destination cannot be opened for writing, no content is
    /// emitted. The input document is not mutated.
    pub fn write(
        &mut self,
        document: &ScenarioDocument,
        destination: &str,
        config: WriteConfig,
    ) -> Result<(), WriteError> {
        let path = format!("{}{}", destination, TEST_CASE_EXTENSION);
        let file = File::create(&path)?;
        let mut out = BufWriter::new(file);
        self.render(&mut out, document, config)?;
        out.flush()?;
        Ok(())
    }

    /// Renders a document into any sink, without touching the filesystem.
    pub fn render<W: Write>(
        &mut self,
        out: &mut W,
        document: &ScenarioDocument,
        config: WriteConfig,
    ) -> Result<(), WriteError> {
        self.test_case_name = document.name.clone();

        writeln!(out, "{}", HEADER_COMMENT)?;
        writeln!(out, "{}", ROOT_OPEN)?;

        self.render_header(out, document, config)?;
        render_world_bounds(out, &document.bounds)?;

        for obstacle in &document.obstacles {
            render_obstacle(out, obstacle, config.obstacle_dispatch)?;
        }

        for agent in &document.agents {
            render_agent(out, agent, config)?;
        }

        writeln!(out, "</SteerBenchTestCase>")?;
        Ok(())
    }

    fn render_header<W: Write>(
        &self,
        out: &mut W,
        document: &ScenarioDocument,
        config: WriteConfig,
    ) -> Result<(), WriteError> {
        writeln!(out, "<header>")?;
        writeln!(out, "\t<version>{}</version>", SCHEMA_VERSION)?;
        writeln!(out, "\t<name>{}</name>", self.test_case_name)?;
        if config.include_scale {
            if let Some(scale) = document.scale {
                writeln!(out, "\t<scale>{:.6}</scale>", scale)?;
            }
        }
        writeln!(out, "</header>")?;
        Ok(())
    }
}

fn render_world_bounds<W: Write>(out: &mut W, bounds: &AxisAlignedBox) -> Result<(), WriteError> {
    writeln!(out, "\t<worldBounds>")?;
    writeln!(out, "\t\t<xmin>{:.6}</xmin>", bounds.xmin)?;
    writeln!(out, "\t\t<xmax>{:.6}</xmax>", bounds.xmax)?;
    writeln!(out, "\t\t<ymin>{:.6}</ymin>", bounds.ymin)?;
    writeln!(out, "\t\t<ymax>{:.6}</ymax>", bounds.ymax)?;
    writeln!(out, "\t\t<zmin>{:.6}</zmin>", bounds.zmin)?;
    writeln!(out, "\t\t<zmax>{:.6}</zmax>", bounds.zmax)?;
    writeln!(out, "\t</worldBounds>")?;
    Ok(())
}

fn render_obstacle<W: Write>(
    out: &mut W,
    obstacle: &ObstacleVariant,
    dispatch: ObstacleDispatch,
) -> Result<(), WriteError> {
    match dispatch {
        ObstacleDispatch::BoxOnly => match obstacle {
            ObstacleVariant::Box { bounds } => render_box_obstacle(out, bounds),
            // Minimal mode's contract is a homogeneous box-only obstacle set.
            other => panic!(
                "box-only obstacle dispatch cannot render {:?}",
                obstacle_kind(other)
            ),
        },
        ObstacleDispatch::BoxPolygon => match obstacle {
            ObstacleVariant::Polygon { vertices } => render_polygon_obstacle(out, vertices),
            // Circles fold into their bounding box in this mode.
            ObstacleVariant::Box { bounds } | ObstacleVariant::Circle { bounds } => {
                render_box_obstacle(out, bounds)
            }
        },
        ObstacleDispatch::BoxPolygonCircle => match obstacle {
            ObstacleVariant::Polygon { vertices } => render_polygon_obstacle(out, vertices),
            ObstacleVariant::Circle { bounds } => render_circle_obstacle(out, bounds),
            ObstacleVariant::Box { bounds } => render_box_obstacle(out, bounds),
        },
    }
}

fn obstacle_kind(obstacle: &ObstacleVariant) -> &'static str {
    match obstacle {
        ObstacleVariant::Box { .. } => "box",
        ObstacleVariant::Circle { .. } => "circle",
        ObstacleVariant::Polygon { .. } => "polygon",
    }
}

fn render_box_obstacle<W: Write>(out: &mut W, bounds: &AxisAlignedBox) -> Result<(), WriteError> {
    writeln!(out, "\t<obstacle>")?;
    writeln!(out, "\t\t<xmin>{:.6}</xmin>", bounds.xmin)?;
    writeln!(out, "\t\t<xmax>{:.6}</xmax>", bounds.xmax)?;
    writeln!(out, "\t\t<ymin>{:.6}</ymin>", bounds.ymin)?;
    writeln!(out, "\t\t<ymax>{:.6}</ymax>", bounds.ymax)?;
    writeln!(out, "\t\t<zmin>{:.6}</zmin>", bounds.zmin)?;
    writeln!(out, "\t\t<zmax>{:.6}</zmax>", bounds.zmax)?;
    writeln!(out, "\t</obstacle>")?;
    Ok(())
}

fn render_polygon_obstacle<W: Write>(out: &mut W, vertices: &[crate::geometry::Vec3]) -> Result<(), WriteError> {
    writeln!(out, "\t<polygonObstacle>")?;
    for vertex in vertices {
        writeln!(
            out,
            "\t\t<vertex> <x>{:.6}</x> <y>{:.6}</y> <z>{:.6}</z> </vertex>",
            vertex.x, vertex.y, vertex.z
        )?;
    }
    writeln!(out, "\t</polygonObstacle>")?;
    Ok(())
}

fn render_circle_obstacle<W: Write>(out: &mut W, bounds: &AxisAlignedBox) -> Result<(), WriteError> {
    let radius = (bounds.xmax - bounds.xmin).abs() / 2.0;
    let height = (bounds.ymax - bounds.ymin).abs();
    let center_x = bounds.xmin + radius;
    let center_z = bounds.zmin + (bounds.zmax - bounds.zmin).abs() / 2.0;

    writeln!(out, "\t<circleObstacle>")?;
    writeln!(out, "\t\t<radius>{:.6}</radius>", radius)?;
    writeln!(out, "\t\t<height>{:.6}</height>", height)?;
    writeln!(out, "\t\t<position>")?;
    writeln!(out, "\t\t\t<x>{:.6}</x>", center_x)?;
    writeln!(out, "\t\t\t<y>0</y>")?;
    writeln!(out, "\t\t\t<z>{:.6}</z>", center_z)?;
    writeln!(out, "\t\t</position>")?;
    writeln!(out, "\t</circleObstacle>")?;
    Ok(())
}

fn render_agent<W: Write>(
    out: &mut W,
    agent: &ScenarioAgent,
    config: WriteConfig,
) -> Result<(), WriteError> {
    let ic = &agent.initial_conditions;

    writeln!(out, "\t<agent>")?;
    writeln!(out, "\t<name>{}</name>", ic.name)?;
    writeln!(out, "\t<initialConditions>")?;
    writeln!(out, "\t\t<radius>{:.6}</radius>", ic.radius)?;
    writeln!(
        out,
        "\t\t<position> <x>{:.6}</x> <y>{:.6}</y> <z>{:.6}</z> </position>",
        ic.position.x, ic.position.y, ic.position.z
    )?;
    writeln!(
        out,
        "\t\t<direction> <x>{:.6}</x> <y>{:.6}</y> <z>{:.6}</z> </direction>",
        ic.direction.x, ic.direction.y, ic.direction.z
    )?;
    writeln!(out, "\t\t<speed>{:.6}</speed>", ic.speed)?;
    writeln!(out, "\t\t<startTime>{:.6}</startTime>", ic.start_time)?;
    writeln!(out, "\t</initialConditions>")?;

    writeln!(out, "\t<goalSequence>")?;
    for goal in &ic.goals {
        render_goal(out, goal)?;
    }
    writeln!(out, "\t</goalSequence>")?;

    if config.include_trajectories {
        let trajectory = agent
            .trajectory
            .as_deref()
            .ok_or_else(|| WriteError::MissingTrajectory {
                agent: ic.name.clone(),
            })?;
        writeln!(out, "\t<sim_real>")?;
        for sample in trajectory {
            writeln!(out, "\t\t<location>")?;
            writeln!(out, "\t\t\t<time>{:.6}</time>", sample.time)?;
            writeln!(out, "\t\t\t<x>{:.6}</x>", sample.position.x)?;
            writeln!(out, "\t\t\t<y>{:.6}</y>", sample.position.y)?;
            writeln!(out, "\t\t\t<z>{:.6}</z>", sample.position.z)?;
            writeln!(out, "\t\t</location>")?;
        }
        writeln!(out, "\t</sim_real>")?;
    }

    writeln!(out, "\t</agent>")?;
    Ok(())
}

fn render_goal<W: Write>(out: &mut W, goal: &GoalDescriptor) -> Result<(), WriteError> {
    let tag = goal_tag(goal.goal_type);

    writeln!(out, "\t\t<{}>", tag)?;
    writeln!(
        out,
        "\t\t\t<targetLocation> <x>{:.6}</x> <y>{:.6}</y> <z>{:.6}</z> </targetLocation>",
        goal.target_location.x, goal.target_location.y, goal.target_location.z
    )?;
    writeln!(out, "\t\t\t<desiredSpeed>{:.6}</desiredSpeed>", goal.desired_speed)?;
    writeln!(out, "\t\t\t<timeDuration>{:.6}</timeDuration>", goal.time_duration)?;
    writeln!(
        out,
        "\t\t\t<targetDirection> <x>{:.6}</x> <y>{:.6}</y> <z>{:.6}</z> </targetDirection>",
        goal.target_direction.x, goal.target_direction.y, goal.target_direction.z
    )?;
    writeln!(out, "\t\t\t<flowType>{}</flowType>", goal.flow_type)?;
    writeln!(
        out,
        "\t\t\t<random>{}</random>",
        if goal.target_is_random { "true" } else { "false" }
    )?;

    match &goal.behavior {
        Some(behavior) if !behavior.steering_algorithm.is_empty() => {
            writeln!(out, "\t\t\t<Behaviour>")?;
            writeln!(
                out,
                "\t\t\t\t<SteeringAlgorithm>{}</SteeringAlgorithm>",
                behavior.steering_algorithm
            )?;
            if !behavior.parameters.is_empty() {
                writeln!(out, "\t\t\t\t<Parameters>")?;
                for parameter in &behavior.parameters {
                    writeln!(out, "\t\t\t\t\t<parameter>")?;
                    writeln!(out, "\t\t\t\t\t\t<key>{}</key>", parameter.key)?;
                    writeln!(out, "\t\t\t\t\t\t<value>{}</value>", parameter.value)?;
                    writeln!(out, "\t\t\t\t\t</parameter>")?;
                }
                writeln!(out, "\t\t\t\t</Parameters>")?;
            }
            writeln!(out, "\t\t\t</Behaviour>")?;
        }
        _ => {}
    }

    writeln!(out, "\t\t</{}>", tag)?;
    Ok(())
}
