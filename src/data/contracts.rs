use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

use alloy::dyn_abi::{DynSolType, DynSolValue, EventExt, FunctionExt, JsonAbiExt, Specifier};
use alloy::json_abi::{Event, Function, JsonAbi};
use alloy::primitives::{Address, Bytes, LogData};
use serde::Deserialize;

pub const DEFAULT_CONTRACT_NAME: &str = "YourContract";

static YOUR_CONTRACT_ABI: OnceLock<Result<JsonAbi, String>> = OnceLock::new();

/// Errors raised while resolving, encoding or decoding contract interactions.
#[derive(Debug, thiserror::Error)]
pub enum ContractError {
    #[error("contract {name} is not deployed on chain {chain_id}")]
    UnknownContract { name: String, chain_id: u64 },

    #[error("function {function} not found in {contract} ABI")]
    UnknownFunction { contract: String, function: String },

    #[error("event {event} not found in {contract} ABI")]
    UnknownEvent { contract: String, event: String },

    #[error("{function} expects {expected} arguments, got {actual}")]
    ArgumentCount {
        function: String,
        expected: usize,
        actual: usize,
    },

    #[error("invalid value {value:?} for parameter {param} ({ty}): {reason}")]
    InvalidArgument {
        param: String,
        ty: String,
        value: String,
        reason: String,
    },

    #[error("argument {0} is not available yet")]
    MissingArgument(usize),

    #[error("no wallet connected")]
    NoWallet,

    #[error("ABI error: {0}")]
    Abi(String),

    #[error("failed to read contracts file {path}: {reason}")]
    Registry { path: String, reason: String },
}

/// A contract as deployed on one chain.
#[derive(Debug, Clone, Deserialize)]
pub struct DeployedContract {
    pub address: Address,
    pub abi: JsonAbi,
}

impl DeployedContract {
    pub fn function(&self, name: &str) -> Option<&Function> {
        self.abi.function(name).and_then(|overloads| overloads.first())
    }

    pub fn event(&self, name: &str) -> Option<&Event> {
        self.abi.event(name).and_then(|overloads| overloads.first())
    }
}

/// Deployed contracts keyed by chain id then contract name, in the same
/// shape as a scaffold `deployedContracts` export.
#[derive(Debug, Clone, Default)]
pub struct ContractRegistry {
    chains: HashMap<u64, HashMap<String, DeployedContract>>,
}

impl ContractRegistry {
    /// Parse a registry from JSON: `{"31337": {"YourContract": {"address": .., "abi": [..]}}}`.
    pub fn from_json(json: &str) -> Result<Self, ContractError> {
        let raw: HashMap<String, HashMap<String, DeployedContract>> =
            serde_json::from_str(json).map_err(|e| ContractError::Abi(e.to_string()))?;

        let mut chains = HashMap::with_capacity(raw.len());
        for (chain, contracts) in raw {
            let chain_id = chain
                .parse::<u64>()
                .map_err(|e| ContractError::Abi(format!("bad chain id {chain:?}: {e}")))?;
            chains.insert(chain_id, contracts);
        }

        Ok(Self { chains })
    }

    pub fn load(path: &Path) -> Result<Self, ContractError> {
        let data = std::fs::read_to_string(path).map_err(|e| ContractError::Registry {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json(&data)
    }

    /// Register a deployment, replacing any existing entry with the same name.
    pub fn insert(&mut self, chain_id: u64, name: &str, contract: DeployedContract) {
        self.chains
            .entry(chain_id)
            .or_default()
            .insert(name.to_string(), contract);
    }

    /// Register the built-in greeter ABI at `address` under `name`.
    pub fn insert_builtin(
        &mut self,
        chain_id: u64,
        name: &str,
        address: Address,
    ) -> Result<(), ContractError> {
        let contract = DeployedContract {
            address,
            abi: your_contract_abi()?.clone(),
        };
        self.insert(chain_id, name, contract);
        Ok(())
    }

    pub fn get(&self, chain_id: u64, name: &str) -> Result<&DeployedContract, ContractError> {
        self.chains
            .get(&chain_id)
            .and_then(|contracts| contracts.get(name))
            .ok_or_else(|| ContractError::UnknownContract {
                name: name.to_string(),
                chain_id,
            })
    }

    pub fn is_empty(&self) -> bool {
        self.chains.values().all(HashMap::is_empty)
    }
}

/// The embedded greeter ABI.
pub fn your_contract_abi() -> Result<&'static JsonAbi, ContractError> {
    YOUR_CONTRACT_ABI
        .get_or_init(|| {
            serde_json::from_str(include_str!("../../abis/your_contract.json"))
                .map_err(|e| e.to_string())
        })
        .as_ref()
        .map_err(|e| ContractError::Abi(e.clone()))
}

/// Encode a view call. Any absent argument fails with `MissingArgument`.
pub fn encode_read(
    function: &Function,
    args: &[Option<DynSolValue>],
) -> Result<Bytes, ContractError> {
    check_arity(function, args.len())?;
    let values = args
        .iter()
        .enumerate()
        .map(|(i, arg)| arg.clone().ok_or(ContractError::MissingArgument(i)))
        .collect::<Result<Vec<_>, _>>()?;
    encode(function, &values)
}

/// Coerce form strings against the function's parameter types and encode.
pub fn encode_write(function: &Function, args: &[String]) -> Result<Bytes, ContractError> {
    check_arity(function, args.len())?;
    let mut values = Vec::with_capacity(args.len());
    for (param, raw) in function.inputs.iter().zip(args) {
        let ty: DynSolType = param
            .resolve()
            .map_err(|e| ContractError::Abi(e.to_string()))?;
        // Strings go through verbatim; the coercion parser would eat quotes.
        if ty == DynSolType::String {
            values.push(DynSolValue::String(raw.clone()));
            continue;
        }
        let value = ty
            .coerce_str(raw.trim())
            .map_err(|e| ContractError::InvalidArgument {
                param: param.name.clone(),
                ty: param.ty.clone(),
                value: raw.clone(),
                reason: e.to_string(),
            })?;
        values.push(value);
    }
    encode(function, &values)
}

/// Decode the first return value of a call.
pub fn decode_first_output(
    function: &Function,
    data: &[u8],
) -> Result<Option<DynSolValue>, ContractError> {
    let mut outputs = function
        .abi_decode_output(data, true)
        .map_err(|e| ContractError::Abi(e.to_string()))?;
    if outputs.is_empty() {
        return Ok(None);
    }
    Ok(Some(outputs.swap_remove(0)))
}

/// Decode a log into `(name, value)` pairs in ABI input order.
pub fn decode_event(
    event: &Event,
    data: &LogData,
) -> Result<Vec<(String, DynSolValue)>, ContractError> {
    let decoded = event
        .decode_log(data, true)
        .map_err(|e| ContractError::Abi(e.to_string()))?;

    let mut indexed = decoded.indexed.into_iter();
    let mut body = decoded.body.into_iter();
    let mut args = Vec::with_capacity(event.inputs.len());
    for input in &event.inputs {
        let value = if input.indexed {
            indexed.next()
        } else {
            body.next()
        };
        if let Some(value) = value {
            args.push((input.name.clone(), value));
        }
    }
    Ok(args)
}

fn check_arity(function: &Function, actual: usize) -> Result<(), ContractError> {
    if function.inputs.len() != actual {
        return Err(ContractError::ArgumentCount {
            function: function.name.clone(),
            expected: function.inputs.len(),
            actual,
        });
    }
    Ok(())
}

fn encode(function: &Function, values: &[DynSolValue]) -> Result<Bytes, ContractError> {
    function
        .abi_encode_input(values)
        .map(Bytes::from)
        .map_err(|e| ContractError::Abi(e.to_string()))
}
