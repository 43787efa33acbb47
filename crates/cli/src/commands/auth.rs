//! Session commands.

use clap::{Args, Subcommand};
use shopfront_client::{Credentials, Shopfront};

use super::CommandError;
use crate::render;

#[derive(Subcommand)]
pub enum AuthAction {
    /// Sign in as a customer
    Login(CredentialArgs),
    /// Create a customer account and sign in
    Register(CredentialArgs),
    /// Sign out and forget the cached cart and orders
    Logout,
    /// Sign in as an administrator
    AdminLogin {
        #[command(flatten)]
        credentials: CredentialArgs,

        /// Ask the backend for a long-lived admin token
        #[arg(long)]
        remember_me: bool,
    },
    /// Sign the administrator out
    AdminLogout,
    /// Show the current sessions
    Whoami,
}

#[derive(Args)]
pub struct CredentialArgs {
    #[arg(short, long)]
    username: String,

    #[arg(short, long, env = "SHOPFRONT_PASSWORD", hide_env_values = true)]
    password: String,
}

impl CredentialArgs {
    fn into_credentials(self) -> Credentials {
        Credentials::new(self.username, self.password)
    }
}

pub async fn run(shop: &Shopfront, action: AuthAction) -> Result<(), CommandError> {
    let auth = shop.auth();
    match action {
        AuthAction::Login(args) => {
            auth.login(&args.into_credentials()).await?;
        }
        AuthAction::Register(args) => {
            auth.register(&args.into_credentials()).await?;
        }
        AuthAction::Logout => auth.logout().await?,
        AuthAction::AdminLogin {
            credentials,
            remember_me,
        } => {
            auth.admin_login(&credentials.into_credentials(), remember_me)
                .await?;
        }
        AuthAction::AdminLogout => auth.admin_logout().await?,
        AuthAction::Whoami => {
            render::sessions(
                auth.current_user().await.as_ref(),
                auth.current_admin().await.as_ref(),
            );
        }
    }
    Ok(())
}
