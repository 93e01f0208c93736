//! `ufc-nft`: collection creation and token minting from positional arguments.
//!
//! Arguments are parsed completely before any key is loaded or any request
//! is made. Usage problems (no command, too few arguments, unknown command)
//! print the usage text and exit 0; malformed values exit 1.

use std::io::Write;

use thiserror::Error;

use crate::blockchain::{
    AccountAddress, BlockchainResult, MoveArg, TransactionPayload, TransactionResult,
};
use crate::scripts::ScriptContext;

/// Default top-up for the signing account, in octas (1 APT).
pub const DEFAULT_FUNDING_OCTAS: u64 = 100_000_000;

pub const USAGE: &str = "\
Usage:
    ufc-nft create-collection <name> <uri> <description> <maximum>
    ufc-nft mint <tokenId> <collection> <name> <uri> <description> <fighterName> <weightClass> <record> <ranking>
    ufc-nft mint-for <recipient> <tokenId> <collection> <name> <uri> <description> <fighterName> <weightClass> <record> <ranking>
    ufc-nft batch-mint <collections_csv> <uris_csv>
    ufc-nft batch-mint-for <collections_csv> <recipients_csv> <uris_csv>

Examples:
    ufc-nft create-collection \"UFC Collection\" \"https://ufc.com/collection\" \"The official UFC NFT collection\" 10000
    ufc-nft mint 1 \"UFC Collection\" \"Jon Jones\" \"https://ufc.com/nft/jon-jones\" \"UFC Heavyweight Champion Jon Jones\" \"Jon Jones\" \"Heavyweight\" \"27-1-0\" 1
    ufc-nft batch-mint \"UFC Collection,UFC Collection\" \"https://ufc.com/nft/1,https://ufc.com/nft/2\"
";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UsageError {
    #[error("No command given")]
    NoCommand,

    #[error("Missing parameters for {0}")]
    MissingArguments(&'static str),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Invalid {field}: '{value}' is not a non-negative integer")]
    InvalidNumber { field: &'static str, value: String },

    #[error("Invalid {field}: {reason}")]
    InvalidAddress { field: &'static str, reason: String },

    #[error("Empty entry in {0}")]
    EmptyEntry(&'static str),

    #[error("List lengths differ: {0}")]
    LengthMismatch(String),
}

impl UsageError {
    /// Whether this is a "show usage and exit 0" condition rather than a
    /// malformed value.
    pub fn shows_usage(&self) -> bool {
        matches!(
            self,
            UsageError::NoCommand | UsageError::MissingArguments(_) | UsageError::UnknownCommand(_)
        )
    }
}

/// Token fields shared by `mint` and `mint-for`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSpec {
    pub token_id: u64,
    pub collection: String,
    pub name: String,
    pub uri: String,
    pub description: String,
    pub fighter_name: String,
    pub weight_class: String,
    pub record: String,
    pub ranking: u64,
}

impl TokenSpec {
    fn parse(args: &[String]) -> Result<Self, UsageError> {
        Ok(Self {
            token_id: parse_u64("tokenId", &args[0])?,
            collection: args[1].clone(),
            name: args[2].clone(),
            uri: args[3].clone(),
            description: args[4].clone(),
            fighter_name: args[5].clone(),
            weight_class: args[6].clone(),
            record: args[7].clone(),
            ranking: parse_u64("ranking", &args[8])?,
        })
    }

    fn move_args(&self) -> Vec<MoveArg> {
        vec![
            MoveArg::U64(self.token_id),
            MoveArg::string(&self.collection),
            MoveArg::string(&self.name),
            MoveArg::string(&self.uri),
            MoveArg::string(&self.description),
            MoveArg::string(&self.fighter_name),
            MoveArg::string(&self.weight_class),
            MoveArg::string(&self.record),
            MoveArg::U64(self.ranking),
        ]
    }
}

const TOKEN_ARGS: usize = 9;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    CreateCollection {
        name: String,
        uri: String,
        description: String,
        maximum: u64,
    },
    Mint(TokenSpec),
    MintFor {
        recipient: AccountAddress,
        token: TokenSpec,
    },
    BatchMint {
        collections: Vec<String>,
        uris: Vec<String>,
    },
    BatchMintFor {
        collections: Vec<String>,
        recipients: Vec<AccountAddress>,
        uris: Vec<String>,
    },
}

/// Parse the positional arguments (without the program name).
pub fn parse_command(args: &[String]) -> Result<Command, UsageError> {
    let Some((name, rest)) = args.split_first() else {
        return Err(UsageError::NoCommand);
    };

    match name.as_str() {
        "create-collection" => {
            require(rest, 4, "create-collection")?;
            Ok(Command::CreateCollection {
                name: rest[0].clone(),
                uri: rest[1].clone(),
                description: rest[2].clone(),
                maximum: parse_u64("maximum", &rest[3])?,
            })
        }
        "mint" => {
            require(rest, TOKEN_ARGS, "mint")?;
            Ok(Command::Mint(TokenSpec::parse(rest)?))
        }
        "mint-for" => {
            require(rest, TOKEN_ARGS + 1, "mint-for")?;
            Ok(Command::MintFor {
                recipient: parse_address("recipient", &rest[0])?,
                token: TokenSpec::parse(&rest[1..])?,
            })
        }
        "batch-mint" => {
            require(rest, 2, "batch-mint")?;
            let collections = split_csv("collections", &rest[0])?;
            let uris = split_csv("uris", &rest[1])?;
            if collections.len() != uris.len() {
                return Err(UsageError::LengthMismatch(format!(
                    "{} collections, {} uris",
                    collections.len(),
                    uris.len()
                )));
            }
            Ok(Command::BatchMint { collections, uris })
        }
        "batch-mint-for" => {
            require(rest, 3, "batch-mint-for")?;
            let collections = split_csv("collections", &rest[0])?;
            let recipients = split_csv("recipients", &rest[1])?
                .iter()
                .map(|r| parse_address("recipient", r))
                .collect::<Result<Vec<_>, _>>()?;
            let uris = split_csv("uris", &rest[2])?;
            if collections.len() != recipients.len() || collections.len() != uris.len() {
                return Err(UsageError::LengthMismatch(format!(
                    "{} collections, {} recipients, {} uris",
                    collections.len(),
                    recipients.len(),
                    uris.len()
                )));
            }
            Ok(Command::BatchMintFor {
                collections,
                recipients,
                uris,
            })
        }
        other => Err(UsageError::UnknownCommand(other.to_string())),
    }
}

fn require(rest: &[String], count: usize, command: &'static str) -> Result<(), UsageError> {
    if rest.len() < count {
        return Err(UsageError::MissingArguments(command));
    }
    Ok(())
}

fn parse_u64(field: &'static str, value: &str) -> Result<u64, UsageError> {
    value.trim().parse().map_err(|_| UsageError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

fn parse_address(field: &'static str, value: &str) -> Result<AccountAddress, UsageError> {
    value.parse().map_err(|e: crate::blockchain::BlockchainError| UsageError::InvalidAddress {
        field,
        reason: e.to_string(),
    })
}

fn split_csv(field: &'static str, value: &str) -> Result<Vec<String>, UsageError> {
    value
        .split(',')
        .map(|item| {
            let item = item.trim();
            if item.is_empty() {
                Err(UsageError::EmptyEntry(field))
            } else {
                Ok(item.to_string())
            }
        })
        .collect()
}

impl Command {
    fn function_name(&self) -> &'static str {
        match self {
            Command::CreateCollection { .. } => "create_collection",
            Command::Mint(_) => "mint_token",
            Command::MintFor { .. } => "mint_token_for",
            Command::BatchMint { .. } => "batch_mint_simple",
            Command::BatchMintFor { .. } => "batch_mint_simple_for",
        }
    }

    fn arguments(&self) -> Vec<MoveArg> {
        match self {
            Command::CreateCollection {
                name,
                uri,
                description,
                maximum,
            } => vec![
                MoveArg::string(name),
                MoveArg::string(uri),
                MoveArg::string(description),
                MoveArg::U64(*maximum),
            ],
            Command::Mint(token) => token.move_args(),
            Command::MintFor { recipient, token } => {
                let mut args = vec![MoveArg::Address(*recipient)];
                args.extend(token.move_args());
                args
            }
            Command::BatchMint { collections, uris } => {
                vec![MoveArg::strings(collections), MoveArg::strings(uris)]
            }
            Command::BatchMintFor {
                collections,
                recipients,
                uris,
            } => vec![
                MoveArg::strings(collections),
                MoveArg::addresses(recipients),
                MoveArg::strings(uris),
            ],
        }
    }

    pub fn payload(&self, ctx: &ScriptContext) -> BlockchainResult<TransactionPayload> {
        Ok(TransactionPayload::entry_function(
            ctx.contract_function(self.function_name())?,
            self.arguments(),
        ))
    }

    fn announce(&self) -> String {
        match self {
            Command::CreateCollection { name, .. } => format!("Creating collection: {}...", name),
            Command::Mint(token) => {
                format!("Minting token: {} with ID {}...", token.name, token.token_id)
            }
            Command::MintFor { recipient, token } => format!(
                "Minting token: {} with ID {} for recipient {}...",
                token.name, token.token_id, recipient
            ),
            Command::BatchMint { collections, .. } => {
                format!("Batch minting {} tokens...", collections.len())
            }
            Command::BatchMintFor { collections, .. } => {
                format!("Batch minting {} tokens for recipients...", collections.len())
            }
        }
    }

    fn completed(&self) -> &'static str {
        match self {
            Command::CreateCollection { .. } => "Collection created!",
            Command::Mint(_) => "Token minted!",
            Command::MintFor { .. } => "Token minted for recipient!",
            Command::BatchMint { .. } | Command::BatchMintFor { .. } => "Batch mint complete!",
        }
    }
}

/// Parse `args`, execute the command and report progress on `out`. Error
/// lines go to `err`. Returns the process exit code.
pub async fn run(
    ctx: &ScriptContext,
    explicit_key: Option<&str>,
    args: &[String],
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> i32 {
    let _ = writeln!(out, "UFC NFT Management Script");
    let _ = writeln!(out, "=========================");

    let command = match parse_command(args) {
        Ok(command) => command,
        Err(e) if e.shows_usage() => {
            if e != UsageError::NoCommand {
                let _ = writeln!(err, "{}", e);
            }
            let _ = write!(out, "{}", USAGE);
            return 0;
        }
        Err(e) => {
            tracing::error!(error = %e, "Invalid arguments");
            let _ = writeln!(err, "Error: {}", e);
            return 1;
        }
    };

    match execute(ctx, explicit_key, &command, out).await {
        Ok(_) => {
            let _ = writeln!(out, "Operation completed successfully!");
            0
        }
        Err(e) => {
            tracing::error!(error = %e, command = command.function_name(), "Command failed");
            let _ = writeln!(err, "Error: {}", e);
            1
        }
    }
}

/// Load and fund the account, then submit `command`.
pub async fn execute(
    ctx: &ScriptContext,
    explicit_key: Option<&str>,
    command: &Command,
    out: &mut dyn Write,
) -> BlockchainResult<TransactionResult> {
    let payload = command.payload(ctx)?;

    let account = ctx
        .prepare_account(explicit_key, DEFAULT_FUNDING_OCTAS)
        .await?;
    writeln!(out, "Using account: {}", account.address())?;
    writeln!(out, "{}", command.announce())?;

    let result = ctx.submitter().submit_and_confirm(&account, &payload).await?;
    writeln!(out, "{} Transaction hash: {}", command.completed(), result.hash)?;

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_create_collection() {
        let command = parse_command(&args(&[
            "create-collection",
            "UFC Collection",
            "https://ufc.com/c",
            "desc",
            "10000",
        ]))
        .unwrap();

        assert_eq!(
            command,
            Command::CreateCollection {
                name: "UFC Collection".into(),
                uri: "https://ufc.com/c".into(),
                description: "desc".into(),
                maximum: 10_000,
            }
        );
    }

    #[test]
    fn test_usage_conditions() {
        assert_eq!(parse_command(&[]), Err(UsageError::NoCommand));
        assert_eq!(
            parse_command(&args(&["mint", "1", "UFC"])),
            Err(UsageError::MissingArguments("mint"))
        );

        let unknown = parse_command(&args(&["burn"])).unwrap_err();
        assert!(unknown.shows_usage());
        assert_eq!(unknown.to_string(), "Unknown command: burn");
    }

    #[test]
    fn test_invalid_values_do_not_show_usage() {
        let err = parse_command(&args(&["create-collection", "n", "u", "d", "lots"])).unwrap_err();
        assert!(!err.shows_usage());
        assert!(matches!(err, UsageError::InvalidNumber { field: "maximum", .. }));

        let err = parse_command(&args(&["batch-mint", "A,B", "uri1"])).unwrap_err();
        assert!(matches!(err, UsageError::LengthMismatch(_)));
        assert!(!err.shows_usage());

        let err = parse_command(&args(&["batch-mint", "A,,B", "1,2,3"])).unwrap_err();
        assert_eq!(err, UsageError::EmptyEntry("collections"));
    }

    #[test]
    fn test_mint_for_parses_recipient_and_token() {
        let command = parse_command(&args(&[
            "mint-for",
            "0x1",
            "2",
            "UFC Collection",
            "Conor McGregor",
            "https://ufc.com/nft/conor-mcgregor",
            "UFC Champion Conor McGregor",
            "Conor McGregor",
            "Lightweight",
            "22-6-0",
            "5",
        ]))
        .unwrap();

        let Command::MintFor { recipient, token } = &command else {
            panic!("expected mint-for, got {:?}", command);
        };
        assert_eq!(*recipient, AccountAddress::one());
        assert_eq!(token.token_id, 2);
        assert_eq!(token.ranking, 5);
        assert_eq!(command.function_name(), "mint_token_for");
        assert_eq!(command.arguments().len(), 10);

        let err = parse_command(&args(&[
            "mint-for", "not-hex", "2", "c", "n", "u", "d", "f", "w", "r", "5",
        ]))
        .unwrap_err();
        assert!(matches!(err, UsageError::InvalidAddress { .. }));
    }

    #[test]
    fn test_batch_mint_for_arguments() {
        let command = parse_command(&args(&["batch-mint-for", "A, B", "0x1,0x1", "u1,u2"])).unwrap();
        let json: Vec<_> = command.arguments().iter().map(MoveArg::to_json).collect();

        assert_eq!(json[0], serde_json::json!(["A", "B"]));
        assert_eq!(json[1].as_array().unwrap().len(), 2);
        assert_eq!(json[2], serde_json::json!(["u1", "u2"]));

        let err = parse_command(&args(&["batch-mint-for", "A,B", "0x1", "u1,u2"])).unwrap_err();
        assert!(matches!(err, UsageError::LengthMismatch(_)));
    }
}
