use tuner_core::Msg;

/// Parses one line of user input into a state-machine message.
pub(crate) fn parse(line: &str) -> Result<Msg, String> {
    let mut parts = line.split_whitespace();
    let Some(verb) = parts.next() else {
        return Ok(Msg::NoOp);
    };

    match verb {
        "jobs" => Ok(Msg::RedrawRequested),
        "models" => Ok(Msg::ListingsRefreshRequested),
        "train" => {
            let dataset_id = parts
                .next()
                .ok_or("usage: train <dataset> <base_model> [epochs]")?
                .to_string();
            let base_model = parts
                .next()
                .ok_or("usage: train <dataset> <base_model> [epochs]")?
                .to_string();
            let epochs = match parts.next() {
                Some(raw) => Some(
                    raw.parse::<u32>()
                        .map_err(|_| format!("epochs must be a number, got {raw}"))?,
                ),
                None => None,
            };
            Ok(Msg::TrainRequested {
                dataset_id,
                base_model,
                epochs,
            })
        }
        "select" => {
            let job_id = parse_job_id(parts.next(), "usage: select <job>")?;
            Ok(Msg::AdapterSelected { job_id })
        }
        "infer" => {
            let prompt = parts.collect::<Vec<_>>().join(" ");
            if prompt.is_empty() {
                return Err("usage: infer <prompt>".to_string());
            }
            Ok(Msg::InferRequested { prompt })
        }
        "upload" => {
            let name = parts
                .next()
                .ok_or("usage: upload <name> <path>")?
                .to_string();
            let path = parts
                .next()
                .ok_or("usage: upload <name> <path>")?
                .to_string();
            Ok(Msg::UploadRequested { name, path })
        }
        "download" => {
            let job_id = parse_job_id(parts.next(), "usage: download <job>")?;
            Ok(Msg::DownloadRequested { job_id })
        }
        "quit" | "exit" => Ok(Msg::QuitRequested),
        other => Err(format!("unknown command: {other}")),
    }
}

fn parse_job_id(raw: Option<&str>, usage: &str) -> Result<u64, String> {
    let raw = raw.ok_or(usage)?;
    raw.parse::<u64>()
        .map_err(|_| format!("job id must be a number, got {raw}"))
}
