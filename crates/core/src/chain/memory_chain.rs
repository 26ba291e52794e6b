//! In-memory chain that emulates the storage and roles contracts closely
//! enough to observe what the migrations did.

use super::chain::Chain;
use crate::bindings::{
    roles2_library::Roles2Library, roles2_library_adapter::Roles2LibraryAdapter,
    storage_manager::StorageManager,
};
use crate::types::transaction::{Receipt, Transaction};
use alloy::primitives::{Address, B256, Bytes, TxKind, U256, aliases::B32, keccak256};
use alloy::sol_types::{SolCall, SolValue};
use async_trait::async_trait;
use eyre::{Result, eyre};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

// Creation and runtime code share one 8-byte marker per contract kind.
pub const STORAGE_CODE: &[u8] = b"STORAGE_";
pub const STORAGE_MANAGER_CODE: &[u8] = b"STORMGR_";
pub const ROLES2_LIBRARY_CODE: &[u8] = b"ROLES2L_";
pub const ADAPTER_CODE: &[u8] = b"ADAPTER_";
pub const EVENTS_HISTORY_CODE: &[u8] = b"EVHIST__";

const MARKER_LEN: usize = 8;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RolesState {
    pub store: Address,
    pub crate_name: B256,
    pub root_users: HashSet<Address>,
    pub user_roles: HashSet<(Address, u8)>,
    pub public_capabilities: HashSet<(Address, B32)>,
    pub capability_roles: HashMap<(Address, B32), U256>,
    pub events_history: Option<Address>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdapterState {
    pub roles2_library: Address,
    pub events_history: Option<Address>,
}

#[derive(Debug, Clone)]
enum Contract {
    Storage,
    StorageManager { allowed: HashSet<(Address, B256)> },
    Roles2Library(RolesState),
    Adapter(AdapterState),
    EventsHistory,
}

impl Contract {
    fn code(&self) -> &'static [u8] {
        match self {
            Contract::Storage => STORAGE_CODE,
            Contract::StorageManager { .. } => STORAGE_MANAGER_CODE,
            Contract::Roles2Library(_) => ROLES2_LIBRARY_CODE,
            Contract::Adapter(_) => ADAPTER_CODE,
            Contract::EventsHistory => EVENTS_HISTORY_CODE,
        }
    }
}

#[derive(Default)]
struct State {
    accounts: Vec<Address>,
    contracts: HashMap<Address, Contract>,
    nonce: u64,
    deployments: usize,
    transactions: usize,
}

pub struct MemoryChain {
    state: Mutex<State>,
}

impl MemoryChain {
    pub fn new(accounts: Vec<Address>) -> Self {
        Self {
            state: Mutex::new(State {
                accounts,
                ..Default::default()
            }),
        }
    }

    /// Chain with `Storage` and `StorageManager` already deployed, as the
    /// migrations expect. Returns their addresses.
    pub async fn with_storage(accounts: Vec<Address>) -> Result<(Self, Address, Address)> {
        let chain = Self::new(accounts);
        let storage = chain.deploy_raw(STORAGE_CODE).await?;
        let storage_manager = chain.deploy_raw(STORAGE_MANAGER_CODE).await?;
        Ok((chain, storage, storage_manager))
    }

    pub async fn deploy_raw(&self, code: &'static [u8]) -> Result<Address> {
        let receipt = self
            .send(Transaction {
                to: TxKind::Create,
                value: U256::ZERO,
                data: Bytes::from_static(code),
            })
            .await?;
        receipt
            .contract_address
            .ok_or_else(|| eyre!("deployment failed"))
    }

    pub fn deployments(&self) -> usize {
        self.lock().deployments
    }

    pub fn transactions(&self) -> usize {
        self.lock().transactions
    }

    pub fn roles_state(&self, address: Address) -> Option<RolesState> {
        match self.lock().contracts.get(&address) {
            Some(Contract::Roles2Library(state)) => Some(state.clone()),
            _ => None,
        }
    }

    pub fn adapter_state(&self, address: Address) -> Option<AdapterState> {
        match self.lock().contracts.get(&address) {
            Some(Contract::Adapter(state)) => Some(state.clone()),
            _ => None,
        }
    }

    pub fn storage_allowed(&self, manager: Address, actor: Address, label: B256) -> bool {
        match self.lock().contracts.get(&manager) {
            Some(Contract::StorageManager { allowed }) => allowed.contains(&(actor, label)),
            _ => false,
        }
    }

    /// Drops a contract, as after a chain reset.
    pub fn wipe(&self, address: Address) {
        self.lock().contracts.remove(&address);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

fn word_address(args: &[u8], index: usize) -> Option<Address> {
    let word = args.get(index * 32..(index + 1) * 32)?;
    Some(Address::from_word(B256::from_slice(word)))
}

fn word(args: &[u8], index: usize) -> Option<B256> {
    let word = args.get(index * 32..(index + 1) * 32)?;
    Some(B256::from_slice(word))
}

fn create(data: &[u8]) -> Option<Contract> {
    if data.len() < MARKER_LEN {
        return None;
    }
    let (code, args) = data.split_at(MARKER_LEN);
    match code {
        c if c == STORAGE_CODE => Some(Contract::Storage),
        c if c == STORAGE_MANAGER_CODE => Some(Contract::StorageManager {
            allowed: HashSet::new(),
        }),
        c if c == ROLES2_LIBRARY_CODE => Some(Contract::Roles2Library(RolesState {
            store: word_address(args, 0)?,
            crate_name: word(args, 1)?,
            ..Default::default()
        })),
        c if c == ADAPTER_CODE => Some(Contract::Adapter(AdapterState {
            roles2_library: word_address(args, 0)?,
            events_history: None,
        })),
        c if c == EVENTS_HISTORY_CODE => Some(Contract::EventsHistory),
        _ => None,
    }
}

fn role_bit(role: u8) -> U256 {
    U256::from(1) << (role as usize)
}

// Applies a state-changing call. `None` means the call reverts.
fn execute(contract: &mut Contract, data: &[u8]) -> Option<()> {
    match contract {
        Contract::StorageManager { allowed } => {
            if let Ok(call) = StorageManager::giveAccessCall::abi_decode(data, true) {
                allowed.insert((call._actor, call._role));
                return Some(());
            }
            if let Ok(call) = StorageManager::blockAccessCall::abi_decode(data, true) {
                allowed.remove(&(call._actor, call._role));
                return Some(());
            }
            None
        }
        Contract::Roles2Library(state) => {
            if let Ok(call) = Roles2Library::setRootUserCall::abi_decode(data, true) {
                if call._enabled {
                    state.root_users.insert(call._user);
                } else {
                    state.root_users.remove(&call._user);
                }
                return Some(());
            }
            if let Ok(call) = Roles2Library::addUserRoleCall::abi_decode(data, true) {
                state.user_roles.insert((call._user, call._role));
                return Some(());
            }
            if let Ok(call) = Roles2Library::removeUserRoleCall::abi_decode(data, true) {
                state.user_roles.remove(&(call._user, call._role));
                return Some(());
            }
            if let Ok(call) = Roles2Library::setPublicCapabilityCall::abi_decode(data, true) {
                if call._enabled {
                    state.public_capabilities.insert((call._code, call._sig));
                } else {
                    state.public_capabilities.remove(&(call._code, call._sig));
                }
                return Some(());
            }
            if let Ok(call) = Roles2Library::addRoleCapabilityCall::abi_decode(data, true) {
                let mask = state
                    .capability_roles
                    .entry((call._code, call._sig))
                    .or_default();
                *mask |= role_bit(call._role);
                return Some(());
            }
            if let Ok(call) = Roles2Library::removeRoleCapabilityCall::abi_decode(data, true) {
                if let Some(mask) = state.capability_roles.get_mut(&(call._code, call._sig)) {
                    *mask &= !role_bit(call._role);
                }
                return Some(());
            }
            if let Ok(call) = Roles2Library::setupEventsHistoryCall::abi_decode(data, true) {
                state.events_history = Some(call._eventsHistory);
                return Some(());
            }
            None
        }
        Contract::Adapter(state) => {
            if let Ok(call) = Roles2LibraryAdapter::setRoles2LibraryCall::abi_decode(data, true) {
                state.roles2_library = call._roles2Library;
                return Some(());
            }
            if let Ok(call) = Roles2LibraryAdapter::setupEventsHistoryCall::abi_decode(data, true)
            {
                state.events_history = Some(call._eventsHistory);
                return Some(());
            }
            None
        }
        Contract::Storage | Contract::EventsHistory => None,
    }
}

// Answers a view call. `None` means the call reverts.
fn view(contract: &Contract, data: &[u8]) -> Option<Vec<u8>> {
    match contract {
        Contract::StorageManager { allowed } => {
            let call = StorageManager::isAllowedCall::abi_decode(data, true).ok()?;
            Some(allowed.contains(&(call._actor, call._role)).abi_encode())
        }
        Contract::Roles2Library(state) => {
            if let Ok(call) = Roles2Library::isUserRootCall::abi_decode(data, true) {
                return Some(state.root_users.contains(&call._user).abi_encode());
            }
            if let Ok(call) = Roles2Library::hasUserRoleCall::abi_decode(data, true) {
                return Some(
                    state
                        .user_roles
                        .contains(&(call._user, call._role))
                        .abi_encode(),
                );
            }
            if let Ok(call) = Roles2Library::isCapabilityPublicCall::abi_decode(data, true) {
                return Some(
                    state
                        .public_capabilities
                        .contains(&(call._code, call._sig))
                        .abi_encode(),
                );
            }
            if let Ok(call) = Roles2Library::getCapabilityRolesCall::abi_decode(data, true) {
                let mask = state
                    .capability_roles
                    .get(&(call._code, call._sig))
                    .copied()
                    .unwrap_or_default();
                return Some(B256::from(mask).abi_encode());
            }
            if Roles2Library::getEventsHistoryCall::abi_decode(data, true).is_ok() {
                return Some(state.events_history.unwrap_or_default().abi_encode());
            }
            None
        }
        Contract::Adapter(state) => {
            if Roles2LibraryAdapter::roles2LibraryCall::abi_decode(data, true).is_ok() {
                return Some(state.roles2_library.abi_encode());
            }
            if Roles2LibraryAdapter::getEventsHistoryCall::abi_decode(data, true).is_ok() {
                return Some(state.events_history.unwrap_or_default().abi_encode());
            }
            None
        }
        Contract::Storage | Contract::EventsHistory => None,
    }
}

#[async_trait]
impl Chain for MemoryChain {
    async fn accounts(&self) -> Result<Vec<Address>> {
        Ok(self.lock().accounts.clone())
    }

    async fn code_at(&self, address: Address) -> Result<Bytes> {
        Ok(self
            .lock()
            .contracts
            .get(&address)
            .map(|c| Bytes::from_static(c.code()))
            .unwrap_or_default())
    }

    async fn call(&self, to: Address, calldata: Bytes) -> Result<Bytes> {
        let state = self.lock();
        let contract = state
            .contracts
            .get(&to)
            .ok_or_else(|| eyre!("call to {} which has no code", to))?;
        view(contract, &calldata)
            .map(Bytes::from)
            .ok_or_else(|| eyre!("execution reverted"))
    }

    async fn send(&self, tx: Transaction) -> Result<Receipt> {
        let mut state = self.lock();
        state.transactions += 1;
        let tx_hash = keccak256(U256::from(state.transactions).to_be_bytes::<32>());

        let (contract_address, success) = match tx.to {
            TxKind::Create => match create(&tx.data) {
                Some(contract) => {
                    let deployer = state.accounts.first().copied().unwrap_or_default();
                    let address = deployer.create(state.nonce);
                    state.nonce += 1;
                    state.deployments += 1;
                    state.contracts.insert(address, contract);
                    (Some(address), true)
                }
                None => (None, false),
            },
            TxKind::Call(to) => {
                state.nonce += 1;
                let success = match state.contracts.get_mut(&to) {
                    Some(contract) => execute(contract, &tx.data).is_some(),
                    None => true,
                };
                (None, success)
            }
        };

        Ok(Receipt {
            tx_hash,
            contract_address,
            success,
        })
    }
}
