use super::config::{parse_time_budget, SantaConfig};
use super::OutputFormat;
use rand::rngs::StdRng;
use rand::SeedableRng;
use santa_shuffle::identity::{ParticipantId, PartyId};
use santa_shuffle::matchmaker::display::{display_names, format_outcome};
use santa_shuffle::matchmaker::{resolve_display_name, ShuffleEngine, ShuffleOutcome};
use santa_shuffle::party::{Party, RosterFile};
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// JSON shape of one pairing
#[derive(Debug, Serialize)]
struct PairingReport {
    giver: ParticipantId,
    giver_name: String,
    recipient: ParticipantId,
    recipient_name: String,
}

/// JSON shape of a shuffle result
#[derive(Debug, Serialize)]
struct ShuffleReport {
    party: PartyId,
    name: Option<String>,
    solved: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pairings: Vec<PairingReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

impl ShuffleReport {
    fn new(outcome: &ShuffleOutcome, party: &Party) -> Self {
        let names = display_names(party);
        let (pairings, reason) = match outcome {
            ShuffleOutcome::Solved(assignment) => (
                assignment
                    .iter()
                    .map(|pairing| PairingReport {
                        giver: pairing.giver.clone(),
                        giver_name: resolve_display_name(&pairing.giver, &names),
                        recipient: pairing.recipient.clone(),
                        recipient_name: resolve_display_name(&pairing.recipient, &names),
                    })
                    .collect(),
                None,
            ),
            ShuffleOutcome::Unsatisfiable(reason) => (Vec::new(), Some(reason.to_string())),
        };

        Self {
            party: party.id(),
            name: party.name().map(str::to_string),
            solved: outcome.is_solved(),
            pairings,
            reason,
        }
    }
}

/// Draw names for a party roster
///
/// ## Time Budget
///
/// Taken from (in order of precedence):
/// 1. `--time-budget` flag if provided
/// 2. `[shuffle] time_budget` in the config file
/// 3. Default of 10 seconds
///
/// ## Exit Status
///
/// An unsatisfiable party is reported to the admin and the command fails, so
/// scripts never mistake "no assignment" for success.
pub async fn execute(
    config: &SantaConfig,
    party_path: String,
    time_budget: Option<String>,
    seed: Option<u64>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let party = RosterFile::load(Path::new(&party_path))?.into_party()?;

    let mut shuffle_config = config.shuffle_config()?;
    if let Some(budget) = time_budget {
        shuffle_config.time_budget = parse_time_budget(&budget)?;
    }

    info!(
        party = %party.id(),
        participants = party.len(),
        budget = %humantime::format_duration(shuffle_config.time_budget),
        "shuffling roster {}",
        party_path
    );

    let engine = ShuffleEngine::new(shuffle_config);
    // The search is CPU-bound and may run for the whole budget.
    let (party, outcome) = tokio::task::spawn_blocking(move || {
        let outcome = match seed {
            Some(seed) => engine.shuffle_with_rng(&party, &mut StdRng::seed_from_u64(seed)),
            None => engine.shuffle(&party),
        };
        (party, outcome)
    })
    .await?;

    match format {
        OutputFormat::Text => println!("{}", format_outcome(&outcome, &party)),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&ShuffleReport::new(&outcome, &party))?
        ),
    }

    match outcome {
        ShuffleOutcome::Solved(_) => Ok(()),
        ShuffleOutcome::Unsatisfiable(reason) => Err(reason.into()),
    }
}
