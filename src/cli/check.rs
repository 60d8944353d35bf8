use santa_shuffle::matchmaker::display::{format_exclusion_report, format_unsatisfiable};
use santa_shuffle::matchmaker::{ExclusionReport, Unsatisfiable};
use santa_shuffle::party::RosterFile;
use std::path::Path;

/// Validate a roster and report how constrained it is
///
/// Checks performed:
/// - Roster parses and every participant has an identity
/// - Exclusions only reference other participants of the same party
/// - Every participant can give to and receive from at least one other
///
/// Passing these checks does not guarantee a draw exists; `shuffle` decides
/// that within its time budget.
pub async fn execute(party_path: String) -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 Checking roster {}...", party_path);
    println!();

    let party = RosterFile::load(Path::new(&party_path))?.into_party()?;

    println!("  Party: {}", party.name().unwrap_or("(unnamed)"));
    println!("  Id: {}", party.id());
    println!("  Participants: {}", party.len());
    match party.admin() {
        Some(admin) => println!("  Admin: {}", admin.name),
        None => println!("  Admin: (none flagged)"),
    }
    println!();

    let report = ExclusionReport::analyze(&party);
    for line in format_exclusion_report(&report, &party) {
        println!("{}", line);
    }
    println!();

    let blocker = if party.len() < 2 {
        Some(Unsatisfiable::TooFewParticipants { count: party.len() })
    } else {
        report.first_blocker().map(Unsatisfiable::from)
    };

    match blocker {
        None => {
            println!("✅ Roster looks shuffleable");
            Ok(())
        }
        Some(reason) => Err(format_unsatisfiable(&reason, &party).into()),
    }
}
