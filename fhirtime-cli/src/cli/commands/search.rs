use crate::cli::commands::Session;
use crate::cli::output::*;
use anyhow::Result;
use clap::Args;
use comfy_table::Cell;
use fhirtime_core::BenchError;
use fhirtime_harness::PatientSearch;

#[derive(Args)]
pub struct SearchArgs {
    /// Family name to search for (matched case-insensitively)
    #[arg(value_name = "FAMILY")]
    pub family: String,
}

pub fn run(args: SearchArgs, session: &Session) -> Result<()> {
    let search = PatientSearch::new(session.client()?);

    let records = search.search_and_print(&args.family).ok_or_else(|| {
        BenchError::Other(format!(
            "search for family '{}' did not complete, see log for details",
            args.family
        ))
    })?;

    section_header(&format!("Patients named {}", args.family));

    let mut table = create_standard_table();
    table.set_header(vec![
        header_cell("First Name"),
        header_cell("Last Name"),
        header_cell("Birth Date"),
        header_cell("Id"),
    ]);

    let mut rows = 0;
    for record in &records {
        let Some(name) = record.name_for_family(&args.family) else {
            continue;
        };
        table.add_row(vec![
            Cell::new(name.first_given().unwrap_or_default()),
            Cell::new(name.family.as_deref().unwrap_or_default()),
            Cell::new(record.birth_date.as_deref().unwrap_or("-")),
            Cell::new(record.label()),
        ]);
        rows += 1;
    }

    if rows == 0 {
        empty(&format!("No patients with family name {}", args.family));
    } else {
        println!("{}", table);
        success(&format!("{} patient(s) found", rows));
    }

    Ok(())
}
