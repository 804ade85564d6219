//! @ai:module:intent CLI for the test-generation benchmark
//! @ai:module:layer presentation

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use testgen_bench::{
    config::{BenchmarkConfig, FilterConfig},
    dataset::{DatasetLoader, DatasetLoaderTrait, Language, Task, TaskCategory},
    evaluator::ScenarioEvaluator,
    execution::LanguageBackends,
    report::{TextReporter, TextReporterTrait},
    runner::{BenchmarkExecutor, LlmClient, LlmClientTrait, MockLlmClient},
    toolchain::ToolchainValidator,
};

const DEFAULT_CONFIG: &str = "benchmark.toml";

#[derive(Parser)]
#[command(name = "testgen-bench")]
#[command(about = "Benchmark measuring the quality of LLM-generated unit, integration and functional tests")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate and score tests for every selected task
    Run {
        /// Models to benchmark, in order (comma-separated)
        #[arg(long)]
        models: Option<String>,

        /// Filter by categories (comma-separated)
        #[arg(long)]
        categories: Option<String>,

        /// Filter by languages (comma-separated)
        #[arg(long)]
        languages: Option<String>,

        /// Filter by task IDs (comma-separated)
        #[arg(long)]
        tasks: Option<String>,

        /// Dataset root directory
        #[arg(long)]
        dataset: Option<PathBuf>,

        /// Use a canned completion instead of calling the endpoint
        #[arg(long)]
        dry_run: bool,
    },

    /// List available tasks
    List {
        /// Filter by category
        #[arg(long)]
        category: Option<String>,

        /// Filter by language
        #[arg(long)]
        language: Option<String>,

        /// Dataset root directory
        #[arg(long)]
        dataset: Option<PathBuf>,
    },

    /// Load the dataset and print task counts
    Validate {
        /// Dataset root directory
        #[arg(long)]
        dataset: Option<PathBuf>,
    },

    /// Initialize default configuration
    Init {
        /// Output path for config file
        #[arg(short, long, default_value = DEFAULT_CONFIG)]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("testgen_bench=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            models,
            categories,
            languages,
            tasks,
            dataset,
            dry_run,
        } => {
            run_benchmarks(RunArgs {
                config: cli.config,
                models,
                categories,
                languages,
                tasks,
                dataset,
                dry_run,
            })
            .await
        }
        Commands::List {
            category,
            language,
            dataset,
        } => list_tasks(cli.config, category, language, dataset),
        Commands::Validate { dataset } => validate(cli.config, dataset),
        Commands::Init { output } => init_config(output),
    }
}

struct RunArgs {
    config: Option<PathBuf>,
    models: Option<String>,
    categories: Option<String>,
    languages: Option<String>,
    tasks: Option<String>,
    dataset: Option<PathBuf>,
    dry_run: bool,
}

/// @ai:intent Run the benchmark for every configured model
/// @ai:effects network, fs:read, fs:write, process
async fn run_benchmarks(args: RunArgs) -> Result<()> {
    let mut config = load_or_default_config(args.config)?;

    if let Some(models) = args.models {
        config.api.models = split_list(&models);
    }
    if let Some(dataset) = args.dataset {
        config.paths.dataset_dir = dataset;
    }
    config.run.dry_run |= args.dry_run;
    let cli_filter = build_filter(args.categories, args.languages, args.tasks);
    config.run.filter = merge_filter(config.run.filter, cli_filter);

    if config.api.models.is_empty() {
        anyhow::bail!("No models configured");
    }

    let toolchain_status = ToolchainValidator::validate(&config.execution);
    ToolchainValidator::log_warnings(&toolchain_status);

    if toolchain_status.available_languages.is_empty() {
        tracing::error!("No language toolchains available. Cannot run benchmarks.");
        return Ok(());
    }

    tracing::info!("Loading dataset from {}", config.paths.dataset_dir.display());

    let loader = DatasetLoader::new();
    let all_tasks = loader.load_filtered(&config.paths.dataset_dir, &config.run.filter)?;

    let tasks: Vec<_> = all_tasks
        .into_iter()
        .filter(|task| toolchain_status.is_available(task.language))
        .collect();

    if tasks.is_empty() {
        tracing::warn!("No tasks match the filter criteria (after excluding unavailable languages)");
        return Ok(());
    }

    tracing::info!("Found {} tasks to run", tasks.len());

    if config.run.dry_run {
        tracing::info!("Running in dry-run mode");
        let client = Arc::new(MockLlmClient::canned());
        run_models(client, &config, &tasks).await
    } else {
        tracing::info!("Using endpoint {}", config.api.base_url);
        let client = Arc::new(LlmClient::new(config.api.clone())?);
        run_models(client, &config, &tasks).await
    }
}

/// @ai:intent Score every task once per model and print one report per model
/// @ai:effects network, fs:write, process, io
async fn run_models<C: LlmClientTrait>(
    client: Arc<C>,
    config: &BenchmarkConfig,
    tasks: &[Task],
) -> Result<()> {
    let backends = LanguageBackends::from_config(&config.execution, &config.paths.work_dir);
    let evaluator = ScenarioEvaluator::new(
        backends,
        Duration::from_millis(config.run.mutation_delay_ms),
    );
    let executor = BenchmarkExecutor::new(client, evaluator);
    let reporter = TextReporter::new();

    for model in &config.api.models {
        tracing::info!("Benchmarking model {}", model);

        let aggregator = executor.run_all(tasks, model).await;
        let summary = aggregator.summary(model);

        println!();
        print!("{}", reporter.render(&summary));
    }

    Ok(())
}

/// @ai:intent List available tasks
/// @ai:effects fs:read
fn list_tasks(
    config_path: Option<PathBuf>,
    category: Option<String>,
    language: Option<String>,
    dataset: Option<PathBuf>,
) -> Result<()> {
    let config = load_or_default_config(config_path)?;
    let dataset_dir = dataset.unwrap_or(config.paths.dataset_dir);
    let loader = DatasetLoader::new();

    let filter = FilterConfig {
        categories: category.map(|c| vec![c]),
        languages: language.map(|l| vec![l]),
        ..Default::default()
    };

    let tasks = loader.load_filtered(&dataset_dir, &filter)?;

    println!("Available tasks ({}):", tasks.len());
    println!();
    println!("{:<12} {:<15} {:<10} {:<30}", "ID", "Category", "Language", "Set");
    println!("{}", "-".repeat(70));

    for task in &tasks {
        println!(
            "{:<12} {:<15} {:<10} {:<30}",
            task.id,
            task.category().as_str(),
            task.language.as_str(),
            task.set
        );
    }

    Ok(())
}

/// @ai:intent Load the dataset and print per-category and per-language counts
/// @ai:effects fs:read
fn validate(config_path: Option<PathBuf>, dataset: Option<PathBuf>) -> Result<()> {
    let config = load_or_default_config(config_path)?;
    let dataset_dir = dataset.unwrap_or(config.paths.dataset_dir);
    let loader = DatasetLoader::new();
    let tasks = loader.load_all(&dataset_dir)?;

    let mut counts: BTreeMap<(TaskCategory, Language), usize> = BTreeMap::new();
    for task in &tasks {
        *counts.entry((task.category(), task.language)).or_default() += 1;
    }

    println!("Dataset validation passed!");
    println!("Total tasks: {}", tasks.len());

    for ((category, language), count) in &counts {
        println!("  - {} / {}: {}", category, language, count);
    }

    Ok(())
}

/// @ai:intent Initialize default configuration file
/// @ai:effects fs:write
fn init_config(output: PathBuf) -> Result<()> {
    let config = BenchmarkConfig::default();
    config.save(&output)?;
    println!("Configuration saved to {}", output.display());
    Ok(())
}

/// @ai:intent Load configuration or use defaults
/// @ai:effects fs:read
fn load_or_default_config(path: Option<PathBuf>) -> Result<BenchmarkConfig> {
    match path {
        Some(p) => BenchmarkConfig::load(&p),
        None => {
            let default_path = PathBuf::from(DEFAULT_CONFIG);

            if default_path.exists() {
                BenchmarkConfig::load(&default_path)
            } else {
                Ok(BenchmarkConfig::default())
            }
        }
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

/// @ai:intent Build filter from CLI arguments
/// @ai:effects pure
fn build_filter(
    categories: Option<String>,
    languages: Option<String>,
    tasks: Option<String>,
) -> FilterConfig {
    FilterConfig {
        categories: categories.as_deref().map(split_list),
        languages: languages.as_deref().map(split_list),
        task_ids: tasks.as_deref().map(split_list),
    }
}

/// @ai:intent CLI filters replace the matching config filters; unset ones keep the config
/// @ai:effects pure
fn merge_filter(config: FilterConfig, cli: FilterConfig) -> FilterConfig {
    FilterConfig {
        categories: cli.categories.or(config.categories),
        languages: cli.languages.or(config.languages),
        task_ids: cli.task_ids.or(config.task_ids),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list_trims_and_drops_empty() {
        assert_eq!(
            split_list(" unit, functional ,,"),
            vec!["unit".to_string(), "functional".to_string()]
        );
    }

    #[test]
    fn test_cli_filter_overrides_config() {
        let config = FilterConfig {
            categories: Some(vec!["unit".to_string()]),
            languages: Some(vec!["go".to_string()]),
            task_ids: None,
        };
        let cli = build_filter(Some("functional".to_string()), None, Some("3,4".to_string()));

        let merged = merge_filter(config, cli);

        assert_eq!(merged.categories, Some(vec!["functional".to_string()]));
        assert_eq!(merged.languages, Some(vec!["go".to_string()]));
        assert_eq!(merged.task_ids, Some(vec!["3".to_string(), "4".to_string()]));
    }
}
