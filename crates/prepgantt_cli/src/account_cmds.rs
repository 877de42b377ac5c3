//! CLI handlers for `login`, `logout` and `whoami`.

use anyhow::Result;

use prepgantt_core::{AccountService, BlobStore};

pub fn cmd_login<S: BlobStore>(accounts: &AccountService<S>, email: &str) -> Result<()> {
    let user = accounts.authenticate(email)?;
    println!("Signed in as {}.", user.identifier);
    Ok(())
}

pub fn cmd_logout<S: BlobStore>(accounts: &AccountService<S>) -> Result<()> {
    accounts.sign_out()?;
    println!("Signed out.");
    Ok(())
}

pub fn cmd_whoami<S: BlobStore>(accounts: &AccountService<S>) -> Result<()> {
    match accounts.current_user()? {
        Some(user) => println!("{} ({})", user.identifier, user.id),
        None => println!("Not signed in. Run `prepgantt login <email>`."),
    }
    Ok(())
}
