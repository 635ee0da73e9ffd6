//! Built-in kinematic engine.
//!
//! A minimal [`SimulationEngine`] used by the `steerbench` binary and the
//! integration tests. Agents move in straight lines toward their current
//! goal at the goal's desired speed; there is no collision avoidance or
//! steering model. Termination is engine-driven: the run ends when every
//! agent has exhausted its goal sequence or the frame cap is reached.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use steer_scenario::{
    AgentInitialConditions, GoalDescriptor, GoalType, ObstacleVariant, ScenarioDocument,
    TrajectorySample, Vec3, WorldBounds,
};

use crate::driver::SCENARIO_MODULE;
use crate::engine::{EngineError, EngineModule, SimAgent, SimulationEngine, SpatialDatabase};
use crate::options::{load_scenario, EngineOptions, SimulationOptions};

/// Spatial index origin of the loaded scenario.
#[derive(Debug, Default, Clone, Copy)]
struct GridOrigin {
    x: f32,
    z: f32,
}

impl SpatialDatabase for GridOrigin {
    fn origin_x(&self) -> f32 {
        self.x
    }

    fn origin_z(&self) -> f32 {
        self.z
    }
}

/// Per-frame diagnostic accumulator backing one named module.
#[derive(Debug, Default)]
struct DiagnosticModule {
    data_lines: Vec<String>,
    log_lines: Vec<String>,
}

impl DiagnosticModule {
    fn clear(&mut self) {
        self.data_lines.clear();
        self.log_lines.clear();
    }
}

impl EngineModule for DiagnosticModule {
    fn data(&self) -> String {
        self.data_lines.join("\n")
    }

    fn log_data(&self) -> String {
        self.log_lines
            .iter()
            .map(|line| format!("{}\n", line))
            .collect()
    }
}

/// A live agent stepping through its goal sequence.
#[derive(Debug)]
struct KinematicAgent {
    position: Vec3,
    start_time: f32,
    goals: Vec<GoalDescriptor>,
    goal_index: usize,
    idle_elapsed: f32,
    log: Vec<TrajectorySample>,
}

impl KinematicAgent {
    fn is_done(&self) -> bool {
        self.goal_index >= self.goals.len()
    }

    /// Advances one timestep. Returns true when the agent moved.
    fn step(&mut self, dt: f32) -> bool {
        let goal = match self.goals.get(self.goal_index) {
            Some(goal) => goal,
            None => return false,
        };

        if goal.goal_type == GoalType::Idle {
            self.idle_elapsed += dt;
            if self.idle_elapsed >= goal.time_duration {
                self.goal_index += 1;
                self.idle_elapsed = 0.0;
            }
            return false;
        }

        let target = goal.target_location;
        let distance = self.position.distance(&target);
        let step = goal.desired_speed.max(0.0) * dt;

        if distance <= step {
            self.position = target;
            self.goal_index += 1;
            return true;
        }
        if step == 0.0 {
            return false;
        }

        let scale = step / distance;
        self.position.x += (target.x - self.position.x) * scale;
        self.position.y += (target.y - self.position.y) * scale;
        self.position.z += (target.z - self.position.z) * scale;
        true
    }
}

impl SimAgent for KinematicAgent {
    fn position_log(&self) -> &[TrajectorySample] {
        &self.log
    }
}

/// Straight-line goal-following engine over a scenario document.
#[derive(Debug)]
pub struct KinematicEngine {
    options: EngineOptions,
    ai_module_name: String,
    document: Option<ScenarioDocument>,
    bounds: WorldBounds,
    origin: GridOrigin,
    initial: Vec<AgentInitialConditions>,
    obstacle_set: Vec<ObstacleVariant>,
    live_agents: Vec<KinematicAgent>,
    scenario_module: DiagnosticModule,
    steering_module: DiagnosticModule,
    frame: u64,
    time: f32,
}

impl Default for KinematicEngine {
    fn default() -> Self {
        Self {
            options: EngineOptions::default(),
            ai_module_name: "sfAI".to_string(),
            document: None,
            bounds: WorldBounds::default(),
            origin: GridOrigin::default(),
            initial: Vec::new(),
            obstacle_set: Vec::new(),
            live_agents: Vec::new(),
            scenario_module: DiagnosticModule::default(),
            steering_module: DiagnosticModule::default(),
            frame: 0,
            time: 0.0,
        }
    }
}

impl KinematicEngine {
    /// Creates an engine over an already-built document.
    ///
    /// `init` skips the scenario file load when a document is present.
    pub fn from_document(document: ScenarioDocument) -> Self {
        Self {
            document: Some(document),
            ..Self::default()
        }
    }

    /// Frames stepped so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Simulation clock in seconds.
    pub fn time(&self) -> f32 {
        self.time
    }

    fn adopt_document(&mut self, document: ScenarioDocument) {
        self.bounds = document.bounds;
        self.origin = GridOrigin {
            x: document.bounds.xmin,
            z: document.bounds.zmin,
        };
        self.initial = document
            .agents
            .iter()
            .map(|agent| agent.initial_conditions.clone())
            .collect();
        self.obstacle_set = document.obstacles.clone();
        self.document = Some(document);
    }
}

impl SimulationEngine for KinematicEngine {
    fn init(&mut self, options: &SimulationOptions) -> Result<(), EngineError> {
        self.options = options.engine.clone();
        self.ai_module_name = options.ai_module.clone();

        match self.document.take() {
            Some(document) => self.adopt_document(document),
            None => {
                let document = load_scenario(&options.scenario)
                    .map_err(|e| EngineError::Config(e.to_string()))?;
                self.adopt_document(document);
            }
        }

        tracing::debug!(
            agents = self.initial.len(),
            obstacles = self.obstacle_set.len(),
            "scenario loaded"
        );
        Ok(())
    }

    fn initialize_simulation(&mut self) {
        let mut rng = SmallRng::seed_from_u64(self.options.seed);
        let bounds = self.bounds;

        self.live_agents = self
            .initial
            .iter()
            .map(|conditions| {
                let mut goals = conditions.goals.clone();
                for goal in &mut goals {
                    if goal.target_is_random {
                        goal.target_location = Vec3::new(
                            rng.gen_range(bounds.xmin..=bounds.xmax),
                            0.0,
                            rng.gen_range(bounds.zmin..=bounds.zmax),
                        );
                    }
                }
                KinematicAgent {
                    position: conditions.position,
                    start_time: conditions.start_time,
                    goals,
                    goal_index: 0,
                    idle_elapsed: 0.0,
                    log: Vec::new(),
                }
            })
            .collect();

        self.frame = 0;
        self.time = 0.0;
        self.scenario_module.clear();
        self.steering_module.clear();
        self.scenario_module
            .log_lines
            .push(format!("initialized {} agents", self.live_agents.len()));
    }

    fn preprocess_simulation(&mut self) {
        self.scenario_module
            .log_lines
            .push("preprocess complete".to_string());
    }

    fn update(&mut self, _real_time: bool) -> bool {
        if self.frame >= self.options.max_frames {
            return false;
        }
        if self.live_agents.iter().all(|agent| agent.is_done()) {
            return false;
        }

        self.frame += 1;
        let dt = self.options.timestep;
        self.time += dt;

        let mut moved = 0;
        for agent in &mut self.live_agents {
            if self.time >= agent.start_time && !agent.is_done() && agent.step(dt) {
                moved += 1;
            }
            agent.log.push(TrajectorySample::new(self.time, agent.position));
        }

        let active = self.live_agents.iter().filter(|a| !a.is_done()).count();
        self.scenario_module.data_lines.push(format!(
            "frame {} time {:.6} active {}",
            self.frame, self.time, active
        ));
        self.steering_module
            .data_lines
            .push(format!("frame {} moved {}", self.frame, moved));
        true
    }

    fn postprocess_simulation(&mut self) {
        self.scenario_module
            .log_lines
            .push(format!("run ended after {} frames", self.frame));
        self.steering_module
            .log_lines
            .push(format!("steering stepped {} frames", self.frame));
    }

    fn cleanup_simulation(&mut self) {
        tracing::debug!(frames = self.frame, "simulation cleaned up");
    }

    fn finish(&mut self) {
        tracing::debug!("kinematic engine shut down");
    }

    fn spatial_database(&self) -> &dyn SpatialDatabase {
        &self.origin
    }

    fn agents(&self) -> Vec<&dyn SimAgent> {
        self.live_agents
            .iter()
            .map(|agent| agent as &dyn SimAgent)
            .collect()
    }

    fn agent_initial_conditions(&self) -> &[AgentInitialConditions] {
        &self.initial
    }

    fn obstacles(&self) -> Vec<ObstacleVariant> {
        self.obstacle_set.clone()
    }

    fn module(&self, name: &str) -> Option<&dyn EngineModule> {
        if name == SCENARIO_MODULE {
            Some(&self.scenario_module)
        } else if name == self.ai_module_name {
            Some(&self.steering_module)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use steer_scenario::{AxisAlignedBox, ScenarioAgent};

    fn walker_document() -> ScenarioDocument {
        let mut document = ScenarioDocument::new(
            "walker",
            AxisAlignedBox::new(-10.0, 10.0, 0.0, 0.0, -10.0, 10.0),
        );
        document.add_agent(ScenarioAgent::new(
            AgentInitialConditions::new("walker", 0.5, Vec3::new(-5.0, 0.0, 0.0)).with_goal(
                GoalDescriptor::new(GoalType::SeekStaticTarget)
                    .with_target_location(Vec3::new(5.0, 0.0, 0.0))
                    .with_desired_speed(1.0),
            ),
        ));
        document
    }

    fn options_with(engine: EngineOptions) -> SimulationOptions {
        SimulationOptions {
            scenario: PathBuf::from("unused.scn"),
            engine,
            ..SimulationOptions::default()
        }
    }

    fn run_to_completion(engine: &mut KinematicEngine) {
        engine.initialize_simulation();
        engine.preprocess_simulation();
        while engine.update(false) {}
        engine.postprocess_simulation();
    }

    #[test]
    fn test_agent_reaches_goal() {
        let mut engine = KinematicEngine::from_document(walker_document());
        engine.init(&options_with(EngineOptions::default())).unwrap();
        run_to_completion(&mut engine);

        let agent = &engine.live_agents[0];
        assert!(agent.is_done());
        assert_eq!(agent.position, Vec3::new(5.0, 0.0, 0.0));
        // 10 units at 1.0 u/s with dt 0.05 -> about 200 frames.
        assert!(engine.frame() >= 199 && engine.frame() <= 201);
    }

    #[test]
    fn test_position_log_has_one_sample_per_frame() {
        let mut engine = KinematicEngine::from_document(walker_document());
        engine.init(&options_with(EngineOptions::default())).unwrap();
        run_to_completion(&mut engine);

        let agent = &engine.live_agents[0];
        assert_eq!(agent.log.len() as u64, engine.frame());
        assert_eq!(agent.log[0].time, 0.05);
    }

    #[test]
    fn test_frame_cap_terminates_run() {
        let mut engine = KinematicEngine::from_document(walker_document());
        engine
            .init(&options_with(EngineOptions {
                max_frames: 10,
                ..EngineOptions::default()
            }))
            .unwrap();
        run_to_completion(&mut engine);

        assert_eq!(engine.frame(), 10);
        assert!(!engine.live_agents[0].is_done());
    }

    #[test]
    fn test_idle_goal_waits_out_duration() {
        let mut document = walker_document();
        document.agents[0].initial_conditions.goals =
            vec![GoalDescriptor::new(GoalType::Idle).with_time_duration(0.5)];

        let mut engine = KinematicEngine::from_document(document);
        engine.init(&options_with(EngineOptions::default())).unwrap();
        run_to_completion(&mut engine);

        // 0.5 s at dt 0.05 -> about 10 idle frames, then done.
        assert!(engine.frame() >= 10 && engine.frame() <= 11);
        assert_eq!(engine.live_agents[0].position, Vec3::new(-5.0, 0.0, 0.0));
    }

    #[test]
    fn test_start_time_delays_movement() {
        let mut document = walker_document();
        document.agents[0].initial_conditions.start_time = 1.0;

        let mut engine = KinematicEngine::from_document(document);
        engine.init(&options_with(EngineOptions::default())).unwrap();
        engine.initialize_simulation();

        for _ in 0..10 {
            assert!(engine.update(false));
        }
        // 0.5 s elapsed, still before the start time.
        assert_eq!(engine.live_agents[0].position, Vec3::new(-5.0, 0.0, 0.0));
    }

    #[test]
    fn test_random_targets_are_seed_deterministic() {
        let mut document = walker_document();
        document.agents[0].initial_conditions.goals =
            vec![GoalDescriptor::new(GoalType::SeekStaticTarget)
                .with_desired_speed(1.0)
                .with_random_target()];

        let resolve = |seed: u64| {
            let mut engine = KinematicEngine::from_document(document.clone());
            engine
                .init(&options_with(EngineOptions {
                    seed,
                    ..EngineOptions::default()
                }))
                .unwrap();
            engine.initialize_simulation();
            engine.live_agents[0].goals[0].target_location
        };

        let first = resolve(7);
        let second = resolve(7);
        let other = resolve(8);

        assert_eq!(first, second);
        assert_ne!(first, other);
        assert!(first.x >= -10.0 && first.x <= 10.0);
        assert!(first.z >= -10.0 && first.z <= 10.0);
    }

    #[test]
    fn test_diagnostic_modules_have_equal_line_counts() {
        let mut engine = KinematicEngine::from_document(walker_document());
        engine.init(&options_with(EngineOptions::default())).unwrap();
        run_to_completion(&mut engine);

        let scenario = engine.module(SCENARIO_MODULE).unwrap().data();
        let steering = engine.module("sfAI").unwrap().data();
        assert_eq!(scenario.lines().count(), steering.lines().count());
        assert_eq!(scenario.lines().count() as u64, engine.frame());
    }

    #[test]
    fn test_module_lookup_uses_configured_ai_name() {
        let mut engine = KinematicEngine::from_document(walker_document());
        engine
            .init(&SimulationOptions {
                scenario: PathBuf::from("unused.scn"),
                ai_module: "pprAI".to_string(),
                ..SimulationOptions::default()
            })
            .unwrap();

        assert!(engine.module("scenario").is_some());
        assert!(engine.module("pprAI").is_some());
        assert!(engine.module("sfAI").is_none());
        assert!(engine.module("footrec").is_none());
    }

    #[test]
    fn test_init_reports_missing_scenario_file() {
        let mut engine = KinematicEngine::default();
        let err = engine
            .init(&SimulationOptions {
                scenario: PathBuf::from("/nonexistent/missing.scn"),
                ..SimulationOptions::default()
            })
            .unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }

    #[test]
    fn test_spatial_origin_comes_from_document_bounds() {
        let mut engine = KinematicEngine::from_document(walker_document());
        engine.init(&options_with(EngineOptions::default())).unwrap();

        let database = engine.spatial_database();
        assert_eq!(database.origin_x(), -10.0);
        assert_eq!(database.origin_z(), -10.0);
    }
}
