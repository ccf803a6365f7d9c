pub(crate) mod error;
pub(crate) mod export;
pub(crate) mod log_args;
pub(crate) mod output;

use std::sync::atomic::AtomicBool;

use error::Error;
use export::{
    capability_rows_csv, fingerprint_rows_csv, similarity_rows_csv, similarity_rows_jsonl,
};
use log_args::LogArgs;
use output::{build_output_path, print_with_less};
use tracing::info;

use clap::{Parser, Subcommand};

use hugin_common::utils::io::file::{write_file, write_lines_to_file};
use hugin_core::{
    hugin_classify::{classify, ClassifyArgs, HeuristicHints, LowercasedText, NoText, TextEvidenceSource},
    hugin_disassemble::{disassemble, DisassemblerArgs},
    hugin_index::{
        build_fingerprints, build_index, build_reference_index, IndexArgs, MemoryStore,
    },
    hugin_similarity::{score, CompareArgs, ContractFingerprint},
};

#[derive(Debug, Parser)]
#[clap(name = "hugin", version)]
pub struct Arguments {
    #[clap(subcommand)]
    pub sub: Subcommands,

    #[clap(flatten)]
    logs: LogArgs,
}

#[derive(Debug, Subcommand)]
#[clap(
    about = "Hugin is a deterministic, rule-based analysis engine for early-era EVM bytecode."
)]
#[allow(clippy::large_enum_variant)]
pub enum Subcommands {
    #[clap(name = "disassemble", about = "Disassemble EVM bytecode to assembly")]
    Disassemble(DisassemblerArgs),

    #[clap(name = "classify", about = "Classify the capabilities of an EVM contract")]
    Classify(ClassifyArgs),

    #[clap(name = "compare", about = "Score the similarity of two EVM bytecodes")]
    Compare(CompareArgs),

    #[clap(
        name = "index",
        about = "Build an approximate similarity index over a contract population"
    )]
    Index(IndexArgs),
}

fn main() -> Result<(), Error> {
    let args = Arguments::parse();

    // setup logging
    let _ = args.logs.init_tracing();

    match args.sub {
        Subcommands::Disassemble(cmd) => {
            // if the user has passed an output filename, override the default filename
            let mut filename: String = "disassembled.asm".to_string();
            let given_name = cmd.name.as_str();

            if !given_name.is_empty() {
                filename = format!("{}-{}", given_name, filename);
            }

            let assembly = disassemble(cmd.clone())
                .map_err(|e| Error::Generic(format!("failed to disassemble bytecode: {}", e)))?;

            if cmd.output == "print" {
                print_with_less(&assembly)
                    .map_err(|e| Error::Generic(format!("failed to print assembly: {}", e)))?;
            } else {
                let output_path = build_output_path(&cmd.output, &filename)
                    .map_err(|e| Error::Generic(format!("failed to build output path: {}", e)))?;

                write_file(&output_path, &assembly)
                    .map_err(|e| Error::Generic(format!("failed to write assembly: {}", e)))?;
            }
        }

        Subcommands::Classify(cmd) => {
            let mut filename: String = "capabilities.csv".to_string();
            let given_name = cmd.name.as_str();

            if !given_name.is_empty() {
                filename = format!("{}-{}", given_name, filename);
            }

            let analysis = cmd
                .get_analysis()
                .map_err(|e| Error::Generic(format!("failed to analyze bytecode: {}", e)))?;
            let source_text = cmd
                .get_source_text()
                .map_err(|e| Error::Generic(format!("failed to read source text: {}", e)))?;

            let address = if cmd.address.is_empty() { "local" } else { cmd.address.as_str() };

            let text: Box<dyn TextEvidenceSource> = match source_text {
                Some(contents) => Box::new(LowercasedText::new(&contents)),
                None => Box::new(NoText),
            };
            let rows =
                classify(address, analysis.as_ref(), text.as_ref(), &HeuristicHints::default());
            info!("classified {} into {} capability rows", address, rows.len());

            let lines = capability_rows_csv(&rows);
            if cmd.output == "print" {
                print_with_less(&lines.join("\n"))
                    .map_err(|e| Error::Generic(format!("failed to print capabilities: {}", e)))?;
            } else {
                let output_path = build_output_path(&cmd.output, &filename)
                    .map_err(|e| Error::Generic(format!("failed to build output path: {}", e)))?;

                write_lines_to_file(&output_path, &lines)
                    .map_err(|e| Error::Generic(format!("failed to write capabilities: {}", e)))?;
            }
        }

        Subcommands::Compare(cmd) => {
            let mut filename: String = "similarity.json".to_string();
            let given_name = cmd.name.as_str();

            if !given_name.is_empty() {
                filename = format!("{}-{}", given_name, filename);
            }

            let (target, candidate) = cmd
                .get_bytecodes()
                .map_err(|e| Error::Generic(format!("failed to read bytecodes: {}", e)))?;

            let a = ContractFingerprint::from_bytecode("target", &target);
            let b = ContractFingerprint::from_bytecode("candidate", &candidate);

            let rendered = match score(&a, &b) {
                Some(result) => serde_json::to_string_pretty(&result).map_err(Error::SerdeError)?,
                None => String::from("no match: the pair falls below the minimum score"),
            };

            if cmd.output == "print" {
                print_with_less(&rendered)
                    .map_err(|e| Error::Generic(format!("failed to print similarity: {}", e)))?;
            } else {
                let output_path = build_output_path(&cmd.output, &filename)
                    .map_err(|e| Error::Generic(format!("failed to build output path: {}", e)))?;

                write_file(&output_path, &rendered)
                    .map_err(|e| Error::Generic(format!("failed to write similarity: {}", e)))?;
            }
        }

        Subcommands::Index(cmd) => {
            let records = cmd
                .get_records()
                .map_err(|e| Error::Generic(format!("failed to load contracts: {}", e)))?;
            let references = cmd
                .get_references()
                .map_err(|e| Error::Generic(format!("failed to load references: {}", e)))?;
            let config = cmd.to_config();

            let mut store = MemoryStore::new();
            let cancelled = AtomicBool::new(false);

            let stats = match references {
                Some(references) => {
                    build_reference_index(&records, &references, &config, &mut store, &cancelled)?
                }
                None => build_index(&records, &config, &mut store, &cancelled)?,
            };
            info!(
                "index build complete: {}/{} contracts fingerprinted, {} rows",
                stats.fingerprinted, stats.contracts, stats.rows_emitted
            );

            let csv_lines = similarity_rows_csv(store.rows());
            if cmd.output == "print" {
                print_with_less(&csv_lines.join("\n"))
                    .map_err(|e| Error::Generic(format!("failed to print index: {}", e)))?;
            } else {
                let given_name = cmd.name.as_str();
                let csv_filename = if given_name.is_empty() {
                    "contract_similarity.csv".to_string()
                } else {
                    format!("{}-contract_similarity.csv", given_name)
                };
                let jsonl_filename = if given_name.is_empty() {
                    "contract_similarity.jsonl".to_string()
                } else {
                    format!("{}-contract_similarity.jsonl", given_name)
                };

                let csv_path = build_output_path(&cmd.output, &csv_filename)
                    .map_err(|e| Error::Generic(format!("failed to build output path: {}", e)))?;
                write_lines_to_file(&csv_path, &csv_lines)
                    .map_err(|e| Error::Generic(format!("failed to write index csv: {}", e)))?;

                let jsonl_lines =
                    similarity_rows_jsonl(store.rows()).map_err(Error::SerdeError)?;
                let jsonl_path = build_output_path(&cmd.output, &jsonl_filename)
                    .map_err(|e| Error::Generic(format!("failed to build output path: {}", e)))?;
                write_lines_to_file(&jsonl_path, &jsonl_lines)
                    .map_err(|e| Error::Generic(format!("failed to write index jsonl: {}", e)))?;

                let summary_filename = if given_name.is_empty() {
                    "bytecode_analysis.csv".to_string()
                } else {
                    format!("{}-bytecode_analysis.csv", given_name)
                };
                let fingerprints = build_fingerprints(&records, config.num_threads);
                let summary_path = build_output_path(&cmd.output, &summary_filename)
                    .map_err(|e| Error::Generic(format!("failed to build output path: {}", e)))?;
                write_lines_to_file(&summary_path, &fingerprint_rows_csv(&fingerprints))
                    .map_err(|e| {
                        Error::Generic(format!("failed to write fingerprint summary: {}", e))
                    })?;
            }
        }
    }

    Ok(())
}
