//! Output rendering for the kccctl CLI.
//!
//! Formats locations, classifications, statuses, and plans for terminal
//! display. JSON passthrough is handled in main; everything here is the
//! human-readable form.

use kcc_core::types::{
    ControllerTypeInfo, MigrationPlan, MigrationStatus, PhaseState, ResourceLocation,
};

/// Print where a resource's artifacts live and which exist.
pub fn print_location(location: &ResourceLocation) {
    println!("Resource: {}", location.resource);
    println!();
    println!("  Service:    {}", location.service);
    println!("  Version:    {}", location.version);
    println!();
    println!("  {:<14} {:<9} {}", "ARTIFACT", "EXISTS", "PATH");
    println!("  {}", "-".repeat(80));
    print_artifact(location, "types", &location.types_file);
    print_artifact(location, "controller", &location.controller_file);
    print_artifact(location, "mapper", &location.mapper_file);
    print_artifact(location, "test_fixtures", &location.test_fixtures_dir);

    if location.candidates.len() > 1 {
        println!();
        println!("  Multiple types files matched (first one used):");
        for candidate in &location.candidates {
            println!("    {}", candidate);
        }
    }
}

fn print_artifact(location: &ResourceLocation, role: &str, path: &str) {
    let exists = location.files_exist.get(role).copied().unwrap_or(false);
    let marker = if exists { "yes" } else { "no" };
    println!("  {:<14} {:<9} {}", role, marker, path);
}

/// Print a resource's controller classification.
pub fn print_controller_type(info: &ControllerTypeInfo) {
    println!("Resource: {}", info.resource);
    println!();
    println!("  Controller Type:  {}", info.controller_type.as_str());
    println!(
        "  Migration Needed: {}",
        if info.migration_needed { "yes" } else { "no" }
    );
    if let Some(ref location) = info.location {
        println!("  Types File:       {}", location);
    }
    if let Some(ref service) = info.service {
        println!("  Service:          {}", service);
    }
    if let Some(ref version) = info.version {
        println!("  Version:          {}", version);
    }
    println!(
        "  Proto Found:      {}",
        if info.has_proto { "yes" } else { "no" }
    );
    if let Some(ref proto) = info.proto_location {
        println!("  Proto Location:   {}", proto);
    }
}

/// Print the phase-by-phase migration status as a checklist.
pub fn print_migration_status(status: &MigrationStatus) {
    println!("Migration status for {}", status.resource);
    println!();
    println!("  Progress: {}", status.overall_progress);
    println!();

    for phase in &status.phases {
        println!(
            "  {} Phase {}: {}",
            phase_marker(phase.status),
            phase.number,
            phase.name
        );
        for (role, exists) in &phase.files_exist {
            println!(
                "        {:<14} {}",
                role,
                if *exists { "yes" } else { "no" }
            );
        }
    }

    println!();
    println!(
        "  Fields can be added: {}",
        if status.can_add_fields { "yes" } else { "no" }
    );
    println!();
    println!("Next: {}", status.next_action);
}

fn phase_marker(state: PhaseState) -> &'static str {
    match state {
        PhaseState::Completed => "[x]",
        PhaseState::InProgress => "[~]",
        PhaseState::NotStarted => "[ ]",
    }
}

/// Print a full migration plan with tasks and target files.
pub fn print_migration_plan(plan: &MigrationPlan) {
    println!("Migration plan for {}", plan.resource);
    println!();
    println!("  Current Type:    {}", plan.current_type.as_str());
    println!(
        "  Needs Migration: {}",
        if plan.needs_migration { "yes" } else { "no" }
    );

    if let Some(ref proto) = plan.proto_info {
        println!();
        println!("  Proto:");
        println!("    Package: {}", proto.proto_package);
        println!("    Message: {}", proto.proto_message);
    }

    for phase in &plan.phases {
        println!();
        println!(
            "  Phase {}: {} ({})",
            phase.phase, phase.name, phase.estimated_time
        );
        println!("    {}", phase.description);
        for task in &phase.tasks {
            println!("    - {}", task);
        }
    }

    if !plan.target_files.is_empty() {
        println!();
        println!("  Target files:");
        for (role, path) in &plan.target_files {
            println!("    {:<14} {}", role, path);
        }
    }

    println!();
    println!("Next: {}", plan.next_action);
}

/// Print the working tree status, or a placeholder when clean.
pub fn print_git_status(status: &str) {
    if status.trim().is_empty() {
        println!("Working tree clean.");
    } else {
        print!("{}", status);
        if !status.ends_with('\n') {
            println!();
        }
    }
}
