//! Profile analysis command

use std::path::PathBuf;

use clap::Args;
use colored::Colorize;
use triad_profile::{AnswerSet, CompatibilityRelation, Profile, ProfileEngine, RoleAssignment};

use crate::error::CliResult;
use crate::output::{self, score, OutputFormat};

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Answer file (JSON)
    pub answers: PathBuf,
}

pub fn execute(engine: &ProfileEngine, args: AnalyzeArgs, format: OutputFormat) -> CliResult<()> {
    let contents = std::fs::read_to_string(&args.answers)?;
    let answers = AnswerSet::from_json_str(&contents)?;
    let profile = engine.analyze(&answers)?;

    if format.is_structured() {
        return output::print_single(&profile, format);
    }
    print_profile(&profile);
    Ok(())
}

fn print_profile(profile: &Profile) {
    output::print_heading(&format!("Profile {}", profile.metadata.profile_id), 72);
    if profile.low_confidence {
        output::print_warning("Too few answers; treat this profile as a rough sketch");
    }
    println!();

    println!("{}", "Roles".bold());
    for role in [&profile.engine, &profile.interface, &profile.safe_mode] {
        print_role(role);
    }
    println!();

    println!("{}", "Relations".bold());
    let relations = &profile.relations;
    print_relation("Engine / Interface", &relations.engine_interface);
    print_relation("Engine / SafeMode", &relations.engine_safe_mode);
    print_relation("Interface / SafeMode", &relations.interface_safe_mode);
    println!();

    match &profile.special_pattern {
        Some(pattern) => {
            println!(
                "{} {} ({})",
                "Pattern:".bold(),
                pattern.name.yellow(),
                score(pattern.confidence)
            );
            println!("  {}", pattern.description.dimmed());
            for line in &pattern.advice {
                println!("  - {}", line);
            }
        }
        None => println!("{} {}", "Pattern:".bold(), "none".dimmed()),
    }
    println!();

    if profile.exemplars.is_empty() {
        println!("{} {}", "Exemplars:".bold(), "none".dimmed());
    } else {
        println!("{}", "Exemplars".bold());
        for m in &profile.exemplars {
            println!("  {} {} ({})", m.name, m.family.dimmed(), score(m.similarity));
        }
    }
    println!();

    println!(
        "{} {}   {} {}",
        "Effectiveness:".bold(),
        score(profile.effectiveness).green(),
        "Confidence:".bold(),
        score(profile.confidence)
    );
    println!("{}", "Strengths".bold());
    for area in &profile.strength_areas {
        println!("  {} {}", "+".green(), area);
    }
    println!("{}", "Growth".bold());
    for area in &profile.growth_areas {
        println!("  {} {}", "~".yellow(), area);
    }

    if !profile.unique_characteristics.is_empty() {
        println!("{}", "Characteristics".bold());
        for line in &profile.unique_characteristics {
            println!("  * {}", line);
        }
    }
    if !profile.recommendations.is_empty() {
        println!("{}", "Recommendations".bold());
        for line in &profile.recommendations {
            println!("  > {}", line);
        }
    }

    let hints = &profile.optimization_hints;
    if !hints.is_empty() {
        println!();
        println!("{}", "Hints".bold());
        for (label, list) in [
            ("now", &hints.immediate),
            ("1-3 months", &hints.short_term),
            ("6-12 months", &hints.long_term),
            ("lifestyle", &hints.lifestyle),
        ] {
            for line in list {
                println!("  {:<12} {}", label.dimmed(), line);
            }
        }
    }
}

fn print_role(role: &RoleAssignment) {
    println!(
        "  {:<10} {} {:<28} score {}  confidence {}",
        role.role.as_str(),
        format!("#{:>2}", role.archetype.get()).bold().yellow(),
        role.name,
        score(role.score),
        score(role.confidence)
    );
}

fn print_relation(label: &str, relation: &CompatibilityRelation) {
    println!(
        "  {:<22} {:<9} {} ({}, {})",
        label,
        relation.relation_type.as_str().bold(),
        format!(
            "syn {} har {} ten {} con {} cha {}",
            score(relation.scores.synergy),
            score(relation.scores.harmony),
            score(relation.scores.tension),
            score(relation.scores.conflict),
            score(relation.scores.chaos)
        )
        .dimmed(),
        relation.provenance,
        score(relation.confidence)
    );
}
