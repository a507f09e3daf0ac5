use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use todo_auth::services::auth::{FixedClock, TokenCodec};

/// Issue an HS256 access or refresh token for local testing.
///
/// Uses the same codec as the server, so any token printed here is accepted
/// by a server started with the same `JWT_SECRET` (as long as the subject is
/// listed in `AUTH_USERS`).
#[derive(Parser, Debug)]
#[command(name = "token-gen", version, about)]
struct Args {
    /// Subject (user name) placed in `sub`
    #[arg(long)]
    subject: String,

    /// Which token to issue
    #[arg(long, value_enum, default_value_t = Kind::Access)]
    kind: Kind,

    /// Signing secret. Default: JWT_SECRET from the environment or .env
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    secret: String,

    /// Override iat (unix seconds). Default: now.
    #[arg(long)]
    iat: Option<i64>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Kind {
    Access,
    Refresh,
    Pair,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let mut codec = TokenCodec::new(&args.secret)?;
    if let Some(iat) = args.iat {
        codec = codec.with_clock(Arc::new(FixedClock(iat)));
    }

    match args.kind {
        Kind::Access => println!("{}", codec.issue_access_token(&args.subject)?),
        Kind::Refresh => println!("{}", codec.issue_refresh_token(&args.subject)?),
        Kind::Pair => {
            let pair = codec.issue_token_pair(&args.subject)?;
            println!("access_token={}", pair.access_token);
            println!("refresh_token={}", pair.refresh_token);
            println!("expires_in={}", pair.expires_in);
        }
    }

    Ok(())
}
