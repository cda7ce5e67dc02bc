//! Rendering of owner views for the terminal.

use sendlink_core::envelope::SendView;

pub fn print_view_json(view: &SendView) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(view)?);
    Ok(())
}

pub fn print_view_plain(view: &SendView, quiet: bool) {
    if quiet {
        println!("{}", view.id);
        return;
    }
    println!("ID: {}", view.id);
    println!("Access ID: {}", view.access_id);
    println!("Auth: {}", view.auth_type);
    if let Some(name) = &view.name {
        println!("Name: {}", name);
    }
    if let Some(notes) = &view.notes {
        println!("Notes: {}", notes);
    }
    if let Some(text) = &view.text {
        if let Some(value) = &text.text {
            println!("Text: {}", value);
        }
    }
    if let Some(file) = &view.file {
        if let Some(name) = &file.file_name {
            println!("File: {}", name);
        }
        if let Some(size) = file.size {
            println!("Size: {} bytes", size);
        }
    }
    if !view.emails.is_empty() {
        println!("Emails: {}", view.emails.join(", "));
    }
    if let Some(max) = view.max_access_count {
        println!("Accesses: {}/{}", view.access_count, max);
    } else {
        println!("Accesses: {}", view.access_count);
    }
    if view.disabled {
        println!("Disabled: yes");
    }
    if let Some(expiration) = view.expiration_date {
        println!("Expires: {}", expiration);
    }
    println!("Deletes: {}", view.deletion_date);
}

pub fn print_view_list(views: &[SendView], quiet: bool) {
    if !quiet {
        println!("ID | TYPE | AUTH | NAME | DELETES");
    }
    for view in views {
        let kind = match view.send_type {
            sendlink_core::SendType::Text => "text",
            sendlink_core::SendType::File => "file",
        };
        println!(
            "{} | {} | {} | {} | {}",
            view.id,
            kind,
            view.auth_type,
            view.name.as_deref().unwrap_or("-"),
            view.deletion_date
        );
    }
}
