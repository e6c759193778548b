//! Projectile component: полёт гранаты к клетке
//!
//! State machine: Armed → InFlight → Resolved.
//! Горизонтальное движение с постоянной скоростью, высота — функция прогресса.

use bevy::prelude::*;

use crate::config::GrenadeConfig;
use crate::grid::{GridPosition, LevelGrid};

/// Completion callback (снимает ActionInProgress у бросившего и т.п.)
///
/// Вызывается ровно один раз, через queued world command.
pub type OnProjectileComplete = Box<dyn FnOnce(&mut World) + Send + Sync + 'static>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectileState {
    #[default]
    Armed,
    InFlight,
    Resolved,
}

/// Результат одного шага полёта
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileStep {
    /// World position (xz + высота дуги)
    pub position: Vec3,
    pub progress: f32,
    pub arrived: bool,
}

/// Граната в полёте
#[derive(Component)]
pub struct Projectile {
    state: ProjectileState,
    tuning: GrenadeConfig,
    thrower: Option<Entity>,
    /// Горизонтальная позиция (y = 0)
    position_xz: Vec3,
    target_cell: GridPosition,
    target_position: Vec3,
    total_distance: f32,
    traveled: f32,
    on_complete: Option<OnProjectileComplete>,
}

impl Projectile {
    pub fn new(tuning: GrenadeConfig, thrower: Option<Entity>) -> Self {
        Self {
            state: ProjectileState::Armed,
            tuning,
            thrower,
            position_xz: Vec3::ZERO,
            target_cell: GridPosition::default(),
            target_position: Vec3::ZERO,
            total_distance: 0.0,
            traveled: 0.0,
            on_complete: None,
        }
    }

    pub fn with_on_complete(
        mut self,
        on_complete: impl FnOnce(&mut World) + Send + Sync + 'static,
    ) -> Self {
        self.on_complete = Some(Box::new(on_complete));
        self
    }

    /// Armed → InFlight. Target — центр клетки на земле.
    ///
    /// Повторный launch уже летящего снаряда игнорируется.
    pub fn launch(&mut self, origin: Vec3, target: GridPosition, grid: &LevelGrid) {
        if self.state != ProjectileState::Armed {
            crate::log_warning(&format!(
                "Projectile launch ignored: state is {:?}",
                self.state
            ));
            return;
        }

        self.position_xz = Vec3::new(origin.x, 0.0, origin.z);
        self.target_cell = target;
        self.target_position = grid.grid_to_world(target);
        self.total_distance = self.position_xz.distance(self.target_position);
        self.traveled = 0.0;
        self.state = ProjectileState::InFlight;
    }

    /// Один шаг полёта (delta в секундах)
    ///
    /// Не перелетает цель: последний шаг обрезается до target.
    /// None если снаряд не InFlight.
    pub fn advance(&mut self, delta_secs: f32) -> Option<ProjectileStep> {
        if self.state != ProjectileState::InFlight {
            return None;
        }

        let to_target = self.target_position - self.position_xz;
        let remaining = to_target.length();
        let max_step = self.tuning.speed * delta_secs.max(0.0);

        if max_step >= remaining {
            self.position_xz = self.target_position;
            self.traveled += remaining;
        } else {
            self.position_xz += to_target / remaining * max_step;
            self.traveled += max_step;
        }

        let remaining = self.remaining_distance();
        let progress = self.progress();
        let height = self.tuning.arc.evaluate(progress) * self.total_distance
            / self.tuning.arc_height_divisor;

        let arrived = remaining <= f32::EPSILON || remaining < self.tuning.reached_distance;
        if arrived {
            self.state = ProjectileState::Resolved;
        }

        Some(ProjectileStep {
            position: self.position_xz + Vec3::Y * height,
            progress,
            arrived,
        })
    }

    /// Забрать callback (второй вызов → None)
    pub fn take_on_complete(&mut self) -> Option<OnProjectileComplete> {
        self.on_complete.take()
    }

    pub fn state(&self) -> ProjectileState {
        self.state
    }

    pub fn tuning(&self) -> &GrenadeConfig {
        &self.tuning
    }

    pub fn thrower(&self) -> Option<Entity> {
        self.thrower
    }

    pub fn target_cell(&self) -> GridPosition {
        self.target_cell
    }

    pub fn target_position(&self) -> Vec3 {
        self.target_position
    }

    pub fn total_distance(&self) -> f32 {
        self.total_distance
    }

    pub fn traveled(&self) -> f32 {
        self.traveled
    }

    pub fn remaining_distance(&self) -> f32 {
        self.position_xz.distance(self.target_position)
    }

    /// Горизонтальный прогресс 0.0 → 1.0
    pub fn progress(&self) -> f32 {
        if self.total_distance <= f32::EPSILON {
            return 1.0;
        }

        (1.0 - self.remaining_distance() / self.total_distance).clamp(0.0, 1.0)
    }
}
