//! Locate, load, aggregate, validate and build in one run

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use trackplan_core::{
    lint, validate, Aggregate, DanglingReference, DefinitionGraph, Document, Error,
    NamespacePolicy, ValidationError, Warning,
};

use crate::error::{LoaderError, LoaderResult, ParseError};
use crate::load::parse_document;
use crate::traits::DefinitionSource;

/// Options for a pipeline run
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineOptions {
    pub namespace: NamespacePolicy,
}

/// One reason a run failed
#[derive(Debug, Clone, PartialEq)]
pub enum RunError {
    Parse(ParseError),
    Validation(ValidationError),
    DanglingReference(DanglingReference),
    Graph(Error),
}

impl std::fmt::Display for RunError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "{}", e),
            Self::Validation(e) => write!(f, "{}", e),
            Self::DanglingReference(r) => write!(f, "{}", r),
            Self::Graph(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for RunError {}

/// Counts shared by success and failure reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub files: usize,
    pub parameters: usize,
    pub events: usize,
    pub elapsed: Duration,
}

/// A successful run
#[derive(Debug, Clone)]
pub struct Report {
    pub stats: RunStats,
    pub graph: DefinitionGraph,
    pub warnings: Vec<Warning>,
}

/// A failed run; no graph is produced
#[derive(Debug, Clone)]
pub struct FailureReport {
    pub stats: RunStats,
    /// Parse errors, then validation errors, then dangling references
    pub errors: Vec<RunError>,
}

/// Outcome of a pipeline run
#[derive(Debug, Clone)]
pub enum RunOutcome {
    Success(Report),
    Failure(FailureReport),
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn stats(&self) -> &RunStats {
        match self {
            Self::Success(report) => &report.stats,
            Self::Failure(report) => &report.stats,
        }
    }

    pub fn graph(&self) -> Option<&DefinitionGraph> {
        match self {
            Self::Success(report) => Some(&report.graph),
            Self::Failure(_) => None,
        }
    }

    pub fn errors(&self) -> &[RunError] {
        match self {
            Self::Success(_) => &[],
            Self::Failure(report) => &report.errors,
        }
    }

    /// The graph, or every error joined one per line
    pub fn into_graph(self) -> Result<DefinitionGraph, String> {
        match self {
            Self::Success(report) => Ok(report.graph),
            Self::Failure(report) => Err(report
                .errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }
}

/// Documents decoded from a source, in file order
#[derive(Debug, Clone, Default)]
pub struct Loaded {
    pub files: Vec<PathBuf>,
    pub documents: Vec<(PathBuf, Document)>,
    pub failures: Vec<ParseError>,
}

/// Runs the full definition pipeline over a source
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    options: PipelineOptions,
}

impl Pipeline {
    pub fn new(options: PipelineOptions) -> Self {
        Self { options }
    }

    pub fn with_namespace(mut self, namespace: NamespacePolicy) -> Self {
        self.options.namespace = namespace;
        self
    }

    /// List and decode every file
    ///
    /// Files are read concurrently; results keep the listing order. Read
    /// failures abort the load, decode failures are collected per file.
    pub async fn load<S>(&self, source: &S) -> LoaderResult<Loaded>
    where
        S: DefinitionSource + ?Sized,
    {
        let files = source.list_files().await?;
        tracing::debug!("Loading {} files from {}", files.len(), source.describe());

        let reads = files.iter().map(|path| read_one(source, path));
        let results = futures::future::join_all(reads).await;

        let mut loaded = Loaded {
            files: files.clone(),
            ..Default::default()
        };
        for (path, result) in files.into_iter().zip(results) {
            match result? {
                Ok(document) => loaded.documents.push((path, document)),
                Err(failure) => {
                    tracing::debug!("{}", failure);
                    loaded.failures.push(failure);
                }
            }
        }
        Ok(loaded)
    }

    /// Run the whole pipeline
    ///
    /// Only filesystem problems return `Err`. Everything else is reported in
    /// the outcome so one run shows every problem at once.
    pub async fn run<S>(&self, source: &S) -> LoaderResult<RunOutcome>
    where
        S: DefinitionSource + ?Sized,
    {
        let started = Instant::now();
        let loaded = self.load(source).await?;

        let aggregate = Aggregate::from_documents(loaded.documents.into_iter().map(|(_, d)| d));
        let mut stats = RunStats {
            files: loaded.files.len(),
            parameters: aggregate.parameters.len(),
            events: aggregate.events.len(),
            elapsed: Duration::ZERO,
        };

        let mut errors: Vec<RunError> = loaded.failures.into_iter().map(RunError::Parse).collect();
        errors.extend(
            validate(&aggregate, self.options.namespace)
                .into_iter()
                .map(RunError::Validation),
        );

        if !errors.is_empty() {
            stats.elapsed = started.elapsed();
            tracing::info!("Run failed with {} error(s)", errors.len());
            return Ok(RunOutcome::Failure(FailureReport { stats, errors }));
        }

        let outcome = match DefinitionGraph::build(&aggregate) {
            Ok(graph) => {
                let warnings = lint(&graph);
                stats.elapsed = started.elapsed();
                tracing::info!(
                    "Built graph from {} files: {} nodes, {} edges, {} warning(s)",
                    stats.files,
                    graph.node_count(),
                    graph.edge_count(),
                    warnings.len()
                );
                RunOutcome::Success(Report {
                    stats,
                    graph,
                    warnings,
                })
            }
            Err(err) => {
                let errors = match err {
                    Error::DanglingReferences(refs) => {
                        refs.into_iter().map(RunError::DanglingReference).collect()
                    }
                    other => vec![RunError::Graph(other)],
                };
                stats.elapsed = started.elapsed();
                tracing::info!("Run failed with {} error(s)", errors.len());
                RunOutcome::Failure(FailureReport { stats, errors })
            }
        };
        Ok(outcome)
    }
}

async fn read_one<S>(
    source: &S,
    path: &Path,
) -> Result<Result<Document, ParseError>, LoaderError>
where
    S: DefinitionSource + ?Sized,
{
    let content = source.read(path).await?;
    Ok(parse_document(path, &content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemorySource;

    const MINIMAL: &str = r#"
parameters:
  - name: age
    type: number
    description: Age of the user
    example: "30"
events:
  - name: signup
    description: Account created
    parameters: [age]
"#;

    fn messages(outcome: &RunOutcome) -> Vec<String> {
        outcome.errors().iter().map(|e| e.to_string()).collect()
    }

    #[tokio::test]
    async fn test_minimal_valid_input() {
        let source = MemorySource::new().with_file("defs.yml", MINIMAL);
        let outcome = Pipeline::default().run(&source).await.unwrap();

        assert!(outcome.is_success());
        let graph = outcome.graph().unwrap();
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.outgoing("signup"), vec!["age"]);
        assert_eq!(outcome.stats().files, 1);
        assert_eq!(outcome.stats().parameters, 1);
        assert_eq!(outcome.stats().events, 1);
    }

    #[tokio::test]
    async fn test_duplicate_across_files_blocks_graph() {
        let source = MemorySource::new()
            .with_file("a.yml", "parameters:\n  - name: age\n    type: number\n")
            .with_file("b.yml", "parameters:\n  - name: age\n    type: string\n");

        let outcome = Pipeline::default().run(&source).await.unwrap();

        assert!(!outcome.is_success());
        assert!(outcome.graph().is_none());
        assert_eq!(messages(&outcome), vec!["Duplicate parameter name: age"]);
    }

    #[tokio::test]
    async fn test_empty_source() {
        let outcome = Pipeline::default().run(&MemorySource::new()).await.unwrap();

        assert!(outcome.is_success());
        assert!(outcome.graph().unwrap().is_empty());
        assert_eq!(outcome.stats().files, 0);
        assert_eq!(outcome.stats().parameters, 0);
        assert_eq!(outcome.stats().events, 0);
    }

    #[tokio::test]
    async fn test_parse_failure_is_collected_and_excluded() {
        let source = MemorySource::new()
            .with_file("a.yml", MINIMAL)
            .with_file("b.yml", "events: [name: {")
            .with_file("c.yml", "parameters:\n  - name: age\n    type: number\n");

        let loaded = Pipeline::default().load(&source).await.unwrap();
        assert_eq!(loaded.files.len(), 3);
        assert_eq!(loaded.documents.len(), 2);
        assert_eq!(loaded.failures[0].path, PathBuf::from("b.yml"));

        let outcome = Pipeline::default().run(&source).await.unwrap();
        let errors = messages(&outcome);
        // Parse errors come first, the remaining files are still validated
        assert_eq!(errors.len(), 2);
        assert!(errors[0].starts_with("Failed to parse b.yml"));
        assert_eq!(errors[1], "Duplicate parameter name: age");
        assert_eq!(outcome.stats().parameters, 2);
    }

    #[tokio::test]
    async fn test_dangling_reference_fails_run() {
        let source = MemorySource::new().with_file(
            "a.yml",
            "events:\n  - name: signup\n    parameters: [age, plan]\n",
        );

        let outcome = Pipeline::default().run(&source).await.unwrap();

        assert_eq!(
            messages(&outcome),
            vec![
                "Event 'signup' references undeclared parameter 'age'",
                "Event 'signup' references undeclared parameter 'plan'",
            ]
        );
        assert_eq!(
            outcome.into_graph().unwrap_err(),
            "Event 'signup' references undeclared parameter 'age'\nEvent 'signup' references undeclared parameter 'plan'"
        );
    }

    #[tokio::test]
    async fn test_namespace_policy() {
        let source = MemorySource::new().with_file(
            "a.yml",
            "parameters:\n  - name: checkout\n    type: string\nevents:\n  - name: checkout\n",
        );

        let shared = Pipeline::default().run(&source).await.unwrap();
        assert_eq!(messages(&shared), vec!["Duplicate event name: checkout"]);

        let separate = Pipeline::default()
            .with_namespace(NamespacePolicy::Separate)
            .run(&source)
            .await
            .unwrap();
        assert!(separate.is_success());
        assert_eq!(separate.graph().unwrap().node_count(), 2);
    }

    #[tokio::test]
    async fn test_run_is_idempotent() {
        let source = MemorySource::new()
            .with_file("events/signup.yml", "events:\n  - name: signup\n    parameters: [age]\n")
            .with_file("params.yml", MINIMAL.replace("signup", "login"));

        let first = Pipeline::default().run(&source).await.unwrap().into_graph().unwrap();
        let second = Pipeline::default().run(&source).await.unwrap().into_graph().unwrap();

        assert_eq!(first, second);
        assert_eq!(first.incoming("age"), vec!["signup", "login"]);
    }

    #[tokio::test]
    async fn test_warnings_do_not_fail_run() {
        let source = MemorySource::new().with_file(
            "a.yml",
            "parameters:\n  - name: age\n    type: number\n  - name: unused\n    type: string\nevents:\n  - name: signup\n    parameters: [age]\n",
        );

        let outcome = Pipeline::default().run(&source).await.unwrap();
        match outcome {
            RunOutcome::Success(report) => {
                assert_eq!(report.warnings.len(), 1);
                assert_eq!(
                    report.warnings[0].to_string(),
                    "Parameter 'unused' is not used by any event"
                );
            }
            RunOutcome::Failure(report) => panic!("unexpected failure: {:?}", report.errors),
        }
    }
}
