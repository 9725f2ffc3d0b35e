use tuner_core::AppViewModel;

pub(crate) fn usage() -> &'static str {
    "commands: jobs | models | train <dataset> <base_model> [epochs] | select <job> | \
     infer <prompt> | upload <name> <path> | download <job> | quit"
}

/// Plain-text dashboard snapshot, printed whenever the state is dirty on a
/// render tick.
pub(crate) fn render(view: &AppViewModel) {
    println!();
    if let Some(status) = &view.status_line {
        println!("[{status}]");
    }

    if view.jobs.is_empty() {
        println!("jobs: none fetched yet ({} tracked)", view.known_jobs);
    } else {
        println!("jobs ({} tracked):", view.known_jobs);
        for job in &view.jobs {
            let adapter = if job.adapter_ready { "  adapter ready" } else { "" };
            println!(
                "  #{:<5} {:<10} dataset {:<6} epochs {}{adapter}",
                job.job_id,
                job.status.to_string(),
                job.dataset_id,
                job.epochs
            );
        }
    }

    if view.no_trained_models {
        println!("adapters: no trained models found");
    } else {
        println!("adapters:");
        for adapter in &view.adapters {
            let marker = if adapter.selected { "*" } else { " " };
            println!("  {marker} job {}: {}", adapter.job_id, adapter.base_model);
        }
    }

    if let Some(sel) = &view.selection {
        println!(
            "selection: base model {} / adapter {}",
            sel.base_model, sel.adapter_id
        );
    }
    if !view.base_models.is_empty() {
        println!("base models:");
        for model in &view.base_models {
            println!("    {:<28} {}", model.id, model.name);
        }
    }
    if let Some(dataset) = &view.last_dataset {
        println!("last dataset: {dataset}");
    }
    if let Some(response) = &view.last_response {
        println!("response: {response}");
    }
}
