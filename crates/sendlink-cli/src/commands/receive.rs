use std::path::Path;

use anyhow::{anyhow, bail};
use dialoguer::Password;

use sendlink_core::access::{AccessProgress, AccessProtocolClient};
use sendlink_core::{SendType, ShareLink};

use crate::cli::ReceiveArgs;
use crate::config::AppContext;

pub async fn run(ctx: &AppContext, args: &ReceiveArgs) -> anyhow::Result<()> {
    // Malformed links fail here, before any network call.
    let link = ShareLink::parse(&args.link)?;
    let access_id = link.access_id.clone();

    let api = ctx.anonymous_api()?;
    let mut client = AccessProtocolClient::new(api, link);

    let mut progress = client.open().await?;
    if progress == AccessProgress::AwaitingAuth {
        progress = if let Some(password) = &args.password {
            client.submit_password(password).await?
        } else if let Some(otp) = &args.otp {
            client.submit_otp(otp).await?
        } else {
            let password = prompt_password()?;
            client.submit_password(&password).await?
        };
    }
    match progress {
        AccessProgress::Authenticated => {}
        AccessProgress::AwaitingAuth => {
            bail!("This Send requires a one-time code. Re-run with --otp <CODE>.")
        }
        AccessProgress::Expired => bail!("Access expired; try the link again."),
    }

    let content = client.decrypt_content()?;

    match content.send_type {
        SendType::Text => {
            if !ctx.quiet {
                if let Some(name) = &content.name {
                    eprintln!("Name: {}", name);
                }
                if let Some(notes) = &content.notes {
                    eprintln!("Notes: {}", notes);
                }
            }
            if let Some(text) = &content.text {
                println!("{}", text);
            }
        }
        SendType::File => {
            let file_id = content
                .file_id
                .as_deref()
                .ok_or_else(|| anyhow!("File Send carries no file id"))?;
            let file_name = content
                .file_name
                .as_deref()
                .map(safe_file_name)
                .unwrap_or_else(|| "send.bin".to_string());
            let target = args.output.clone().unwrap_or(file_name);

            let api = ctx.anonymous_api()?;
            let blob = api.download(&access_id, file_id).await?;
            let plaintext = client.decrypt_file_blob(&blob)?;
            std::fs::write(&target, plaintext)?;
            if !ctx.quiet {
                if let Some(size) = content.file_size {
                    eprintln!("Size: {} bytes", size);
                }
                println!("Wrote {}", target);
            }
        }
    }
    Ok(())
}

fn prompt_password() -> anyhow::Result<String> {
    Password::new()
        .with_prompt("Send password")
        .interact()
        .map_err(|e| anyhow!("Failed to read password: {}", e))
}

/// Reduce the sender-supplied file name to a bare basename.
///
/// The name is attacker-controlled plaintext; separators or parent
/// components in it must never steer the write outside the working
/// directory. An explicit `--output` is the recipient's own choice and is
/// used as given.
fn safe_file_name(name: &str) -> String {
    Path::new(name)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "send.bin".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_file_name_kept() {
        assert_eq!(safe_file_name("report.pdf"), "report.pdf");
    }

    #[test]
    fn test_traversal_name_reduced_to_basename() {
        assert_eq!(safe_file_name("../../.bashrc"), ".bashrc");
        assert_eq!(safe_file_name("a/b/c.txt"), "c.txt");
    }

    #[test]
    fn test_absolute_path_reduced_to_basename() {
        assert_eq!(safe_file_name("/etc/passwd"), "passwd");
    }

    #[test]
    fn test_directory_like_names_fall_back() {
        assert_eq!(safe_file_name(""), "send.bin");
        assert_eq!(safe_file_name(".."), "send.bin");
        assert_eq!(safe_file_name("a/.."), "send.bin");
    }
}
