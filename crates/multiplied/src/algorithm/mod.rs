//! Stage planning and execution.
//!
//! An [`Algorithm`] holds an ordered list of stages for one bitwidth. Stages
//! are planned structurally, against [`Matrix::seed`] and each stage's
//! predicted output, and then replayed against concrete operands by
//! [`Algorithm::exec`]. The plan is not consumed by execution, so one
//! algorithm can evaluate any number of operand pairs.
//!
//! # Example
//!
//! ```
//! use multiplied::Algorithm;
//!
//! let mut algorithm = Algorithm::new(8).unwrap();
//! algorithm.auto_resolve_stage(true).unwrap();
//! assert_eq!(algorithm.len(), 4);
//!
//! let trace = algorithm.exec(201, 77).unwrap();
//! let last = trace.values().last().unwrap();
//! assert_eq!(last.row_value(0), 201 * 77);
//! ```

mod config;
mod reduce;

pub use config::{AlgorithmConfig, ZeroOperandPolicy, DEFAULT_MAX_STAGES};

use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, warn};

use crate::cell::Bitwidth;
use crate::error::{Error, Result};
use crate::map::Map;
use crate::matrix::Matrix;
use crate::template::{resolve_pattern, Pattern, Template, TemplateUnit};

/// What a stage is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageSource {
    /// A ready template, used as is.
    Template(Template),
    /// A pattern, compiled against the previous stage's predicted output.
    Pattern(Pattern),
}

impl From<Template> for StageSource {
    fn from(template: Template) -> Self {
        Self::Template(template)
    }
}

impl From<Pattern> for StageSource {
    fn from(pattern: Pattern) -> Self {
        Self::Pattern(pattern)
    }
}

/// One planned reduction step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    template: Template,
    pseudo: Matrix,
    map: Map,
    units: Vec<TemplateUnit>,
}

impl Stage {
    /// The stage's template.
    #[must_use]
    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Predicted output shape after the map is applied.
    #[must_use]
    pub fn pseudo(&self) -> &Matrix {
        &self.pseudo
    }

    /// Row map applied after reduction.
    #[must_use]
    pub fn map(&self) -> &Map {
        &self.map
    }

    /// Units isolated from the template.
    #[must_use]
    pub fn units(&self) -> &[TemplateUnit] {
        &self.units
    }
}

/// A reduction plan plus the live state it executes on.
///
/// Execution mutates the live matrix and the stage cursor, so one instance
/// must not be shared between concurrent evaluations; clone it instead.
#[derive(Debug, Clone)]
pub struct Algorithm {
    bits: Bitwidth,
    config: AlgorithmConfig,
    seed: Matrix,
    matrix: Matrix,
    stages: Vec<Stage>,
    state: usize,
}

impl Algorithm {
    /// Empty plan with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedBitwidth`] for `bits` outside `{4, 8}`.
    pub fn new(bits: usize) -> Result<Self> {
        Self::with_config(bits, AlgorithmConfig::default())
    }

    /// Empty plan with an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedBitwidth`] for `bits` outside `{4, 8}`.
    pub fn with_config(bits: usize, config: AlgorithmConfig) -> Result<Self> {
        let seed = Matrix::seed(bits)?;
        Ok(Self {
            bits: seed.bits(),
            config,
            matrix: seed.clone(),
            seed,
            stages: Vec::new(),
            state: 0,
        })
    }

    /// Bitwidth of the plan.
    #[inline]
    #[must_use]
    pub fn bits(&self) -> Bitwidth {
        self.bits
    }

    /// Active configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &AlgorithmConfig {
        &self.config
    }

    /// Live matrix.
    #[inline]
    #[must_use]
    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    /// Planned stages in execution order.
    #[inline]
    #[must_use]
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Index of the next stage [`Algorithm::step`] will run.
    #[inline]
    #[must_use]
    pub fn state(&self) -> usize {
        self.state
    }

    /// Number of planned stages.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// `true` before any stage is planned.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Shape the next stage is planned against: the last stage's predicted
    /// output, or the seed shape.
    #[must_use]
    pub fn predicted(&self) -> &Matrix {
        self.stages.last().map_or(&self.seed, |stage| &stage.pseudo)
    }

    /// Append a stage.
    ///
    /// A pattern is first compiled against [`Algorithm::predicted`]. The
    /// template's result becomes the stage's predicted shape, relocated by
    /// `map`, or when `map` is `None`, by a row map packing it towards row 0.
    ///
    /// # Errors
    ///
    /// - [`Error::BitwidthMismatch`] if the source or map has another width
    /// - any compilation error of [`Template::from_pattern`]
    /// - [`Error::StructuralAmbiguity`] if the template's units are ambiguous
    /// - [`Error::MapOutOfRange`] or [`Error::NotImplemented`] from applying
    ///   the map
    pub fn push(&mut self, source: impl Into<StageSource>, map: Option<Map>) -> Result<()> {
        let (template, runs) = match source.into() {
            StageSource::Template(template) => (template, Vec::new()),
            StageSource::Pattern(pattern) => (
                Template::from_pattern(&pattern, self.predicted())?,
                pattern.runs(),
            ),
        };
        self.bits.expect_eq("template", template.bits())?;
        let mut units = template.collect_template_units()?;
        // A run may reach over empty rows; its unit keeps the run's height.
        for unit in &mut units {
            if let Some(run) = runs.iter().find(|run| run.tag == Some(unit.tag())) {
                unit.extend_to(run.rows().end);
            }
        }

        let mut pseudo = template.result_matrix();
        let map = match map {
            Some(map) => {
                self.bits.expect_eq("map", map.bits())?;
                map
            }
            None => pseudo.resolve_rmap(self.config.ignore_zeros),
        };
        pseudo.apply_map(&map)?;

        debug!(
            stage = self.stages.len(),
            units = units.len(),
            active_rows = pseudo.active_rows(),
            "pushed stage"
        );
        self.stages.push(Stage {
            template,
            pseudo,
            map,
            units,
        });
        Ok(())
    }

    /// Plan stages automatically with [`resolve_pattern`].
    ///
    /// Without `recursive` exactly one stage is pushed. With it, stages are
    /// pushed until the predicted shape has at most one active row, which
    /// then holds the whole product.
    ///
    /// # Errors
    ///
    /// - [`Error::RunawayReduction`] if the plan would exceed
    ///   [`AlgorithmConfig::max_stages`]
    /// - any error of [`Algorithm::push`]
    pub fn auto_resolve_stage(&mut self, recursive: bool) -> Result<()> {
        loop {
            let predicted = self.predicted();
            if recursive && predicted.bits().bits() - predicted.empty_rows() <= 1 {
                return Ok(());
            }
            if self.stages.len() >= self.config.max_stages {
                return Err(Error::RunawayReduction {
                    limit: self.config.max_stages,
                });
            }
            let pattern = resolve_pattern(predicted);
            self.push(pattern, None)?;
            if !recursive {
                return Ok(());
            }
        }
    }

    /// Run the stage at the cursor on the live matrix and advance.
    ///
    /// # Errors
    ///
    /// - [`Error::NoPendingStage`] when every stage has run
    /// - any reduction error; the live matrix and cursor are then unchanged
    pub fn step(&mut self) -> Result<&Matrix> {
        let stage = self.stages.get(self.state).ok_or(Error::NoPendingStage {
            state: self.state,
            stages: self.stages.len(),
        })?;
        self.matrix = reduce::reduce(&self.matrix, stage)?;
        self.state += 1;
        Ok(&self.matrix)
    }

    /// Multiply `a` by `b` through every planned stage.
    ///
    /// Returns the matrix after each stage keyed by stage number, with the
    /// operand matrix as stage 0. The cursor is reset afterwards, also on
    /// failure, so the plan can be executed again.
    ///
    /// When an operand is zero and [`ZeroOperandPolicy::ShortCircuit`] is
    /// configured, only stage 0, the zero shape, is returned.
    ///
    /// # Errors
    ///
    /// - [`Error::OperandOutOfRange`] if an operand exceeds the bitwidth
    /// - any reduction error of [`Algorithm::step`]
    pub fn exec(&mut self, a: u32, b: u32) -> Result<BTreeMap<usize, Matrix>> {
        let seed = Matrix::from_operands(self.bits.bits(), a, b)?;
        let mut trace = BTreeMap::new();
        if (a == 0 || b == 0) && self.config.zero_operands == ZeroOperandPolicy::ShortCircuit {
            warn!(a, b, "zero operand, returning the zero shape without running stages");
            trace.insert(0, seed);
            return Ok(trace);
        }

        self.matrix = seed;
        self.state = 0;
        trace.insert(0, self.matrix.clone());
        let run = self.run_all(&mut trace);
        self.state = 0;
        run.map(|()| trace)
    }

    fn run_all(&mut self, trace: &mut BTreeMap<usize, Matrix>) -> Result<()> {
        while self.state < self.stages.len() {
            let matrix = self.step()?.clone();
            trace.insert(self.state, matrix);
        }
        Ok(())
    }

    /// Replace the live matrix and rewind the cursor. The plan is kept.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BitwidthMismatch`] if `matrix` has another width.
    pub fn reset(&mut self, matrix: Matrix) -> Result<()> {
        self.bits.expect_eq("matrix", matrix.bits())?;
        self.matrix = matrix;
        self.state = 0;
        Ok(())
    }
}

/// Every stage as its template, predicted shape, and map.
impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, stage) in self.stages.iter().enumerate() {
            if i > 0 {
                f.write_str("\n\n")?;
            }
            write!(
                f,
                "stage {i}\n{}\n\n{}\n\n{}",
                stage.template.grid(),
                stage.pseudo,
                stage.map
            )?;
        }
        Ok(())
    }
}
