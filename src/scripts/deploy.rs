//! Publishing the compiled Move package.

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::blockchain::{
    AccountAddress, BlockchainError, BlockchainResult, EntryFunctionId, MoveArg,
    TransactionPayload, TransactionResult,
};
use crate::scripts::ScriptContext;

pub const DEFAULT_FUNDING_OCTAS: u64 = 100_000_000;
pub const DEFAULT_PACKAGE_DIR: &str = "build/UFC_NFT";

/// Compiled package artifacts as produced by the Move compiler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledPackage {
    pub metadata: Vec<u8>,
    /// Module bytecode in publication order.
    pub modules: Vec<(String, Vec<u8>)>,
}

impl CompiledPackage {
    /// Read `package-metadata.bcs` and `bytecode_modules/<name>.mv` for each
    /// of `module_names` under `dir`.
    ///
    /// The node resolves a module's dependencies only from modules earlier in
    /// the bundle or already on chain, so `module_names` must list
    /// dependencies first. The order is kept as given.
    pub fn load(dir: &Path, module_names: &[String]) -> BlockchainResult<Self> {
        if module_names.is_empty() {
            return Err(BlockchainError::Config(
                "no modules selected for publication".to_string(),
            ));
        }

        let metadata_path = dir.join("package-metadata.bcs");
        let metadata = fs::read(&metadata_path).map_err(|e| {
            BlockchainError::Config(format!(
                "cannot read package metadata {}: {}",
                metadata_path.display(),
                e
            ))
        })?;

        let modules_dir = dir.join("bytecode_modules");
        let mut modules = Vec::with_capacity(module_names.len());
        for name in module_names {
            if modules.iter().any(|(seen, _): &(String, Vec<u8>)| seen == name) {
                return Err(BlockchainError::Config(format!(
                    "module '{}' listed more than once",
                    name
                )));
            }

            let path = modules_dir.join(format!("{}.mv", name));
            let code = fs::read(&path).map_err(|e| {
                BlockchainError::Config(format!("cannot read module {}: {}", path.display(), e))
            })?;
            modules.push((name.clone(), code));
        }

        Ok(Self { metadata, modules })
    }

    pub fn payload(&self) -> TransactionPayload {
        TransactionPayload::entry_function(
            EntryFunctionId::new(AccountAddress::one(), "code", "publish_package_txn"),
            vec![
                MoveArg::Bytes(self.metadata.clone()),
                MoveArg::Vector(
                    self.modules
                        .iter()
                        .map(|(_, code)| MoveArg::Bytes(code.clone()))
                        .collect(),
                ),
            ],
        )
    }
}

/// Publish `modules` (dependencies first) from the package in
/// `package_dir`. An empty list publishes only the configured contract
/// module.
pub async fn deploy(
    ctx: &ScriptContext,
    explicit_key: Option<&str>,
    package_dir: &Path,
    modules: &[String],
    out: &mut dyn Write,
) -> BlockchainResult<TransactionResult> {
    let module_names = if modules.is_empty() {
        vec![ctx.config.contract.module.clone()]
    } else {
        modules.to_vec()
    };
    let package = CompiledPackage::load(package_dir, &module_names)?;
    let names: Vec<&str> = package.modules.iter().map(|(n, _)| n.as_str()).collect();
    tracing::info!(package = ?package_dir, modules = ?names, "Package loaded");

    let account = ctx.prepare_account(explicit_key, DEFAULT_FUNDING_OCTAS).await?;
    writeln!(out, "Account address: {}", account.address())?;
    writeln!(out, "Publishing modules: {}", names.join(", "))?;

    let result = ctx
        .submitter()
        .submit_and_confirm(&account, &package.payload())
        .await?;
    writeln!(out, "Transaction hash: {}", result.hash)?;
    writeln!(out, "Module published successfully!")?;

    Ok(result)
}
