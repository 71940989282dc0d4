//! Command-line front end for the practice engine.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use practice_core::types::{Difficulty, Question, SkillLevel};
use serde::Serialize;

use crate::db::PracticeRepository;
use crate::services::PracticeEngine;

#[derive(Debug, Parser)]
#[command(name = "practice", version, about = "Spaced-repetition practice engine")]
pub struct Cli {
    /// SQLite database file (overrides PRACTICE_DATABASE_PATH)
    #[arg(long, global = true)]
    pub database: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Record an answer and update the review schedule
    Record {
        #[arg(long)]
        learner: i64,
        #[arg(long)]
        question: i64,
        #[arg(long)]
        category: String,
        #[arg(long, action = ArgAction::Set)]
        correct: bool,
    },
    /// Show today's review queue
    Queue {
        #[arg(long)]
        learner: i64,
    },
    /// Show the difficulty tier to serve next
    Difficulty {
        #[arg(long)]
        learner: i64,
        #[arg(long)]
        category: String,
    },
    /// Filter a JSON array of questions to a difficulty band
    Filter {
        #[arg(long)]
        difficulty: Difficulty,
        /// Path to a JSON array of questions
        #[arg(long)]
        questions: PathBuf,
    },
    /// Store a learner's assessed skill level for a category
    Skill {
        #[arg(long)]
        learner: i64,
        #[arg(long)]
        category: String,
        #[arg(long)]
        level: SkillLevel,
    },
    /// Summarize a learner's review state
    Stats {
        #[arg(long)]
        learner: i64,
    },
}

/// Run one command against the engine, printing JSON to stdout.
pub fn execute<R: PracticeRepository>(engine: &PracticeEngine<R>, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Record {
            learner,
            question,
            category,
            correct,
        } => print_json(&engine.submit_attempt(learner, question, &category, correct)?),
        Command::Queue { learner } => print_json(&engine.build_queue(learner)?),
        Command::Difficulty { learner, category } => {
            print_json(&engine.difficulty_decision(learner, &category)?)
        }
        Command::Filter {
            difficulty,
            questions,
        } => {
            let raw = fs::read_to_string(&questions)
                .with_context(|| format!("Failed to read {}", questions.display()))?;
            let pool: Vec<Question> = serde_json::from_str(&raw)
                .with_context(|| format!("Failed to parse questions in {}", questions.display()))?;
            print_json(&engine.filter_questions(pool, difficulty))
        }
        Command::Skill {
            learner,
            category,
            level,
        } => {
            engine.set_skill_level(learner, &category, level)?;
            print_json(&serde_json::json!({
                "learner_id": learner,
                "category": category.trim(),
                "skill_level": level,
            }))
        }
        Command::Stats { learner } => print_json(&engine.learner_stats(learner)?),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_record_with_explicit_bool() {
        let cli = Cli::try_parse_from([
            "practice", "record", "--learner", "1", "--question", "42", "--category", "algebra",
            "--correct", "false",
        ])
        .unwrap();
        match cli.command {
            Command::Record { correct, question, .. } => {
                assert!(!correct);
                assert_eq!(question, 42);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_database_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["practice", "stats", "--learner", "3", "--database", "x.db"]).unwrap();
        assert_eq!(cli.database, Some(PathBuf::from("x.db")));
    }

    #[test]
    fn rejects_unknown_difficulty() {
        let err = Cli::try_parse_from([
            "practice", "filter", "--difficulty", "extreme", "--questions", "q.json",
        ]);
        assert!(err.is_err());
    }
}
