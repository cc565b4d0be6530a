//! Cruise task
//!
//! Holds the speed requested by the navigation task. Forward speed is the
//! measured velocity projected onto the body forward axis, so reversing
//! reads as negative speed.

use super::context::{AutopilotContext, CruiseCommand, TaskOutput};
use crate::control::Pid;
use crate::parameters::NavigationParams;
use crate::scheduler::{Routine, Step, StepContext, TaskFault};
use crate::vehicle::VehicleController;

/// Speed-hold routine
pub struct CruiseControl {
    speed: Pid,
}

impl CruiseControl {
    pub fn new(params: &NavigationParams) -> Self {
        Self {
            speed: params.speed.build(),
        }
    }

    fn command<V: VehicleController>(&mut self, cx: &AutopilotContext<V>, dt: f32) -> CruiseCommand {
        if cx.hold_brake {
            self.speed.clear();
            return CruiseCommand {
                braking: true,
                ..CruiseCommand::default()
            };
        }

        if !cx.enabled || !cx.cruise.is_active() {
            self.speed.clear();
            return CruiseCommand::default();
        }

        let target = cx
            .cruise
            .target_speed()
            .min(cx.controller.speed_limit().max(0.0));
        let forward_speed = cx.sensors.velocity.dot(&cx.frame().forward());
        let propulsion = self
            .speed
            .signal(target - forward_speed, dt)
            .clamp(-1.0, 1.0);

        CruiseCommand {
            target_speed: target,
            propulsion,
            braking: false,
        }
    }
}

impl<V: VehicleController> Routine<AutopilotContext<V>, TaskOutput> for CruiseControl {
    fn name(&self) -> &'static str {
        "cruise"
    }

    fn step(
        &mut self,
        step: &mut StepContext<'_, AutopilotContext<V>>,
    ) -> Result<Step<TaskOutput>, TaskFault> {
        let dt = step.dt;
        let command = self.command(step.shared, dt);
        Ok(Step::Yield(TaskOutput::Cruise(command)))
    }

    fn restart(&mut self) {
        self.speed.clear();
    }
}
