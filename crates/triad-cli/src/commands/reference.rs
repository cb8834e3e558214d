//! Reference-data commands: dynamics, compatibility, archetype listing and
//! matrix export

use clap::Args;
use colored::Colorize;
use triad_profile::{
    CompatibilityMatrix, FallbackContext, ProfileEngine, TableDocument, TrigramId, UserVector,
    TRIGRAM_COUNT,
};

use crate::error::{CliError, CliResult};
use crate::output::{self, score, OutputFormat};

#[derive(Args, Debug)]
pub struct DynamicsArgs {
    /// Upper trigram id (1-8)
    pub upper: u8,
    /// Lower trigram id (1-8)
    pub lower: u8,
    /// Eight comma-separated dimension weights used to estimate an
    /// invalid trigram id
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    pub vector: Option<Vec<f64>>,
}

fn parse_vector(values: &[f64]) -> CliResult<UserVector> {
    let array: [f64; TRIGRAM_COUNT] = values.try_into().map_err(|_| {
        CliError::InvalidArgument(format!(
            "--vector needs {} values, got {}",
            TRIGRAM_COUNT,
            values.len()
        ))
    })?;
    Ok(UserVector::from_array(array))
}

pub fn dynamics(engine: &ProfileEngine, args: DynamicsArgs, format: OutputFormat) -> CliResult<()> {
    let context = args
        .vector
        .as_deref()
        .map(parse_vector)
        .transpose()?
        .map(FallbackContext::UserVector);
    let resolved = engine.compute_dynamics(args.upper, args.lower, context.as_ref())?;

    if format.is_structured() {
        return output::print_single(&resolved, format);
    }

    let title = match (TrigramId::new(args.upper), TrigramId::new(args.lower)) {
        (Ok(upper), Ok(lower)) => {
            let archetype = engine.table().archetype_for(upper, lower);
            format!("Dynamics of #{} {}", archetype.id, archetype.name)
        }
        _ => format!("Dynamics of trigram pair {} / {}", args.upper, args.lower),
    };
    output::print_heading(&title, 50);
    for (property, value) in resolved.value.iter() {
        println!(
            "  {:<16} {:>4.1}  {}",
            property.as_str(),
            value,
            "█".repeat(value.round() as usize).cyan()
        );
    }
    println!();
    println!(
        "  {} {} via {} (confidence {})",
        "Provenance:".bold(),
        resolved.provenance,
        resolved.strategy,
        score(resolved.confidence)
    );
    if resolved.is_estimate() {
        output::print_info("Estimated from context; not canonical trigram data");
    }
    Ok(())
}

pub fn compat(engine: &ProfileEngine, a: u8, b: u8, format: OutputFormat) -> CliResult<()> {
    let relation = engine.evaluate_compatibility(a, b)?;

    if format.is_structured() {
        return output::print_single(&relation, format);
    }

    let table = engine.table();
    output::print_heading(
        &format!(
            "#{} {} / #{} {}",
            relation.a,
            table.archetype(relation.a).name,
            relation.b,
            table.archetype(relation.b).name
        ),
        60,
    );
    let scores = relation.scores;
    for (label, value) in [
        ("synergy", scores.synergy),
        ("harmony", scores.harmony),
        ("tension", scores.tension),
        ("conflict", scores.conflict),
        ("chaos", scores.chaos),
    ] {
        println!("  {:<10} {}", label, score(value));
    }
    println!();
    println!(
        "  {} {}",
        "Relation:".bold(),
        relation.relation_type.as_str().yellow()
    );
    println!("  {}", relation.advice.dimmed());
    println!(
        "  {} {} via {} (confidence {})",
        "Provenance:".bold(),
        relation.provenance,
        relation.strategy,
        score(relation.confidence)
    );
    Ok(())
}

pub fn archetypes(
    engine: &ProfileEngine,
    keyword: Option<&str>,
    format: OutputFormat,
) -> CliResult<()> {
    let table = engine.table();
    let keyword = keyword.map(|k| k.trim().to_lowercase());
    let selected: Vec<_> = table
        .archetypes()
        .iter()
        .filter(|a| keyword.as_deref().map_or(true, |k| a.has_keyword(k)))
        .collect();

    if format.is_structured() {
        return output::print_single(&selected, format);
    }

    if selected.is_empty() {
        println!("{}", "No archetypes".dimmed());
        return Ok(());
    }
    output::print_heading("Archetypes", 72);
    for archetype in selected {
        println!(
            "  {} {:<28} {}",
            format!("#{:>2}", archetype.id.get()).bold().yellow(),
            archetype.name,
            archetype
                .keywords
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ")
                .dimmed()
        );
    }
    Ok(())
}

/// Emit a table document whose matrix holds every pair scored by the
/// heuristic, ready to be passed back through `--table`.
pub fn matrix(engine: &ProfileEngine, format: OutputFormat) -> CliResult<()> {
    let table = engine.table();
    let matrix = CompatibilityMatrix::precompute(table, &engine.config().heuristic);
    let document = TableDocument {
        trigrams: table.trigrams().to_vec(),
        archetypes: Some(table.archetypes().to_vec()),
        matrix: Some(matrix.to_entries()),
    };
    output::print_single(&document, format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vector_needs_eight_values() {
        let vector = parse_vector(&[1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 2.0]).unwrap();
        assert_eq!(vector.as_array()[7], 2.0);

        let err = parse_vector(&[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, CliError::InvalidArgument(_)));
    }
}
