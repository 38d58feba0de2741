//! 検査・コンパイル・拡張パイプライン

use crate::compiler::AxiomCompiler;
use crate::config::CompilerConfig;
use crate::instances::InstanceAxiomGenerator;
use crate::reasoner::{ReasonerAdapter, ReasoningSummary};
use crate::report::ConstraintReport;
use crate::CompileError;
use chrono::{DateTime, Utc};
use mimizuku_core::{
    DefaultWellFormednessChecker, Diagnostic, EntityModel, InstanceModel, WellFormednessChecker,
    WellFormednessReport,
};
use mimizuku_dl::{DlOntology, Renderer};
use serde::{Deserialize, Serialize};
use tracing::info;

/// A checked model together with its compiled ontology
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Translation {
    /// The model after repairs made by the well-formedness check
    pub model: EntityModel,
    pub ontology: DlOntology,
    pub diagnostics: Vec<Diagnostic>,
    pub constraints: Vec<ConstraintReport>,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl Translation {
    pub fn skipped_constraints(&self) -> impl Iterator<Item = &ConstraintReport> {
        self.constraints.iter().filter(|report| !report.is_emitted())
    }

    /// Asks `reasoner` about the compiled ontology
    pub fn check_with<R: ReasonerAdapter + ?Sized>(
        &self,
        reasoner: &mut R,
        renderer: Renderer,
    ) -> Result<ReasoningSummary, R::Error> {
        ReasoningSummary::collect(reasoner, &self.ontology, renderer)
    }
}

/// Runs the well-formedness check and the compiler in sequence
#[derive(Debug, Clone, Default)]
pub struct Translator {
    config: CompilerConfig,
}

impl Translator {
    pub fn new(config: CompilerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Checks and repairs `model` in place
    pub fn check(&self, model: &mut EntityModel) -> Result<WellFormednessReport, CompileError> {
        let report = DefaultWellFormednessChecker.check(model)?;
        for message in report.messages() {
            info!(diagnostic = %message, "model repaired");
        }
        Ok(report)
    }

    /// Checks a copy of `model` and compiles it
    pub fn translate(&self, model: &EntityModel) -> Result<Translation, CompileError> {
        let started_at = Utc::now();
        let mut model = model.clone();
        let report = self.check(&mut model)?;
        let compilation = AxiomCompiler::new(self.config.clone()).compile(&model)?;

        Ok(Translation {
            model,
            ontology: compilation.ontology,
            diagnostics: report.diagnostics,
            constraints: compilation.constraints,
            started_at,
            completed_at: Utc::now(),
        })
    }

    /// The ontology of `translation` extended with closed-world axioms for
    /// `instances`
    pub fn extend(&self, translation: &Translation, instances: &InstanceModel) -> Result<DlOntology, CompileError> {
        let naming = self.config.naming(&translation.model.package);
        let axioms = InstanceAxiomGenerator::new(naming).generate(&translation.model, instances)?;

        let mut ontology = translation.ontology.clone();
        let before = ontology.len();
        ontology.extend(axioms);
        info!(added = ontology.len() - before, total = ontology.len(), "ontology extended");
        Ok(ontology)
    }
}
