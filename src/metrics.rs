//! OpenTelemetry instruments and tracing spans for rendering and condition checks.
//!
//! Instruments are registered against the global meter provider; installing an
//! exporter is left to the application.

#[cfg(feature = "metrics")]
use once_cell::sync::Lazy;
#[cfg(feature = "metrics")]
use opentelemetry::{
    global,
    metrics::{Counter, Histogram},
    KeyValue,
};

#[cfg(feature = "metrics")]
use crate::dialect::EngineId;

#[cfg(feature = "metrics")]
pub static METRICS: Lazy<MigratorMetrics> = Lazy::new(MigratorMetrics::init);

#[cfg(feature = "metrics")]
pub struct MigratorMetrics {
    pub statements_rendered: Counter<u64>,
    pub render_errors: Counter<u64>,
    pub conditions_evaluated: Counter<u64>,
    pub condition_errors: Counter<u64>,
    pub condition_duration: Histogram<f64>,
}

#[cfg(feature = "metrics")]
impl MigratorMetrics {
    pub fn init() -> Self {
        let meter = global::meter("sqlmigrator");

        let statements_rendered = meter
            .u64_counter("sqlmigrator_statements_rendered_total")
            .with_description("Migration statements rendered to SQL")
            .build();

        let render_errors = meter
            .u64_counter("sqlmigrator_render_errors_total")
            .with_description("Migrations that could not be rendered for an engine")
            .build();

        let conditions_evaluated = meter
            .u64_counter("sqlmigrator_conditions_evaluated_total")
            .with_description("Migration conditions evaluated against a live database")
            .build();

        let condition_errors = meter
            .u64_counter("sqlmigrator_condition_errors_total")
            .with_description("Condition introspection queries that failed")
            .build();

        let condition_duration = meter
            .f64_histogram("sqlmigrator_condition_duration_seconds")
            .with_description("Duration of condition introspection queries")
            .build();

        Self {
            statements_rendered,
            render_errors,
            conditions_evaluated,
            condition_errors,
            condition_duration,
        }
    }

    pub fn record_render(&self, engine: EngineId) {
        self.statements_rendered
            .add(1, &[KeyValue::new("engine", engine.as_str())]);
    }

    pub fn record_render_error(&self, engine: EngineId) {
        self.render_errors
            .add(1, &[KeyValue::new("engine", engine.as_str())]);
    }

    pub fn record_condition(&self, engine: EngineId, elapsed: std::time::Duration) {
        let attrs = [KeyValue::new("engine", engine.as_str())];
        self.conditions_evaluated.add(1, &attrs);
        self.condition_duration.record(elapsed.as_secs_f64(), &attrs);
    }

    pub fn record_condition_error(&self, engine: EngineId) {
        self.condition_errors
            .add(1, &[KeyValue::new("engine", engine.as_str())]);
    }
}

#[cfg(feature = "tracing")]
pub mod tracing_helpers {
    use tracing::{info_span, Span};

    /// Span wrapping one `Migration::sql` render
    pub fn render_span(migration_id: &str, engine: &str) -> Span {
        info_span!("sqlmigrator.render", migration.id = migration_id, db.system = engine)
    }

    /// Span wrapping one condition introspection query
    pub fn condition_span(condition: &str, engine: &str) -> Span {
        info_span!("sqlmigrator.condition", condition = condition, db.system = engine)
    }

    /// Span wrapping a statement sent through an executor
    pub fn execute_span(sql: &str) -> Span {
        info_span!("sqlmigrator.execute", db.statement = sql)
    }

    /// Span wrapping connection establishment
    pub fn connect_span() -> Span {
        info_span!("sqlmigrator.connect")
    }
}
