//! Provisioning manager implementation
//!
//! This module provides the main interface for the provisioning module:
//! it drives concurrent handshake sessions keyed by device UUID, allocates
//! unicast addresses, and reports progress through an event callback.

use super::constants::*;
use super::node::UnprovisionedNode;
use super::state::{self, ProvisioningState};
use super::types::*;
use crate::address::{END_UNICAST_ADDRESS, START_UNICAST_ADDRESS};
use log::{info, warn};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};

/// Type for provisioning event callback
pub type ProvisioningEventCallback =
    Arc<Mutex<dyn FnMut([u8; 16], ProvisioningEvent) -> ProvisioningResult<()> + Send + Sync>>;

/// Bearer seam the manager sends provisioning PDUs through
pub trait ProvisioningTransport: Send + Sync {
    /// Deliver one complete provisioning PDU to the device.
    fn send_provisioning_pdu(
        &self,
        node: &UnprovisionedNode,
        pdu: &[u8],
    ) -> ProvisioningResult<()>;
}

/// One in-flight provisioning handshake
struct ProvisioningSession {
    node: UnprovisionedNode,
    state: ProvisioningState,
    /// Refreshed on every PDU in either direction
    last_activity: Instant,
    /// Whether the manager allocated the unicast address and must release
    /// it on failure
    allocated_address: bool,
}

impl ProvisioningSession {
    fn new(node: UnprovisionedNode) -> Self {
        ProvisioningSession {
            node,
            state: ProvisioningState::Invite,
            last_activity: Instant::now(),
            allocated_address: false,
        }
    }

    fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    fn has_timed_out(&self, timeout: Duration) -> bool {
        self.last_activity.elapsed() > timeout
    }
}

/// Hands out consecutive unicast address blocks sized by element count
pub struct UnicastAllocator {
    next_address: Mutex<u16>,
}

impl UnicastAllocator {
    /// Start allocating at `first_address`.
    pub fn new(first_address: u16) -> Self {
        UnicastAllocator {
            next_address: Mutex::new(first_address.max(START_UNICAST_ADDRESS)),
        }
    }

    /// Reserve a block of `element_count` consecutive unicast addresses
    /// and return its first address.
    pub fn allocate(&self, element_count: u8) -> ProvisioningResult<u16> {
        if element_count == 0 {
            return Err(ProvisioningError::InvalidUnicastRange);
        }

        let mut next = self.next_address.lock().unwrap();
        let first = *next;
        let last = u32::from(first) + u32::from(element_count) - 1;
        if first < START_UNICAST_ADDRESS || last > u32::from(END_UNICAST_ADDRESS) {
            return Err(ProvisioningError::AddressExhausted);
        }

        *next = (last + 1) as u16;
        Ok(first)
    }

    /// Return a block if it was the most recent allocation. Out-of-order
    /// releases leave a hole rather than corrupt later allocations.
    pub fn release(&self, first_address: u16, element_count: u8) {
        let mut next = self.next_address.lock().unwrap();
        let last = u32::from(first_address) + u32::from(element_count) - 1;
        if last + 1 == u32::from(*next) {
            *next = first_address;
        }
    }
}

/// Provisioning manager
///
/// Owns the session table and drives each handshake forward as PDUs
/// arrive. The caller supplies a [`ProvisioningTransport`] to reach the
/// device and learns about progress through the event callback.
pub struct ProvisioningManager {
    /// Active sessions, keyed by device UUID
    sessions: RwLock<HashMap<[u8; 16], ProvisioningSession>>,

    /// Event callback
    event_callback: Mutex<Option<ProvisioningEventCallback>>,

    /// Bearer for outgoing PDUs
    transport: Arc<dyn ProvisioningTransport>,

    /// Unicast address allocator for nodes without a preassigned address
    allocator: UnicastAllocator,

    /// Per-state response deadline
    timeout: Duration,
}

impl ProvisioningManager {
    /// Create a new provisioning manager.
    pub fn new(transport: Arc<dyn ProvisioningTransport>, first_unicast_address: u16) -> Self {
        ProvisioningManager {
            sessions: RwLock::new(HashMap::new()),
            event_callback: Mutex::new(None),
            transport,
            allocator: UnicastAllocator::new(first_unicast_address),
            timeout: Duration::from_millis(STATE_TIMEOUT_MS),
        }
    }

    /// Set the event callback
    pub fn set_event_callback<F>(&self, callback: F)
    where
        F: FnMut([u8; 16], ProvisioningEvent) -> ProvisioningResult<()> + Send + Sync + 'static,
    {
        let mut event_callback = self.event_callback.lock().unwrap();
        *event_callback = Some(Arc::new(Mutex::new(callback)));
    }

    /// Override the per-state response deadline.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    /// Start provisioning a device: open a session and send the invite.
    ///
    /// The session then waits for the capabilities PDU; the caller gets a
    /// `CapabilitiesReceived` event and must answer with [`provision`].
    ///
    /// [`provision`]: ProvisioningManager::provision
    pub fn identify(
        &self,
        mut node: UnprovisionedNode,
        attention_timer: u8,
    ) -> ProvisioningResult<()> {
        let device_uuid = node.device_uuid;
        {
            let sessions = self.sessions.read().unwrap();
            if sessions.contains_key(&device_uuid) {
                return Err(ProvisioningError::InvalidState("Invite"));
            }
        }

        let pdu = state::build_invite(&mut node, attention_timer);

        {
            let mut sessions = self.sessions.write().unwrap();
            sessions.insert(device_uuid, ProvisioningSession::new(node));
        }

        info!(
            "provisioning session opened for {}",
            crate::utils::bytes_to_hex(&device_uuid, true)
        );
        self.send(&device_uuid, &pdu)?;
        self.notify(
            &device_uuid,
            ProvisioningEvent::StateChanged {
                state: ProvisioningState::Invite,
                pdu: Some(pdu),
            },
        )
    }

    /// Record a device public key obtained out of band.
    ///
    /// Must be called before [`provision`]; the key exchange then skips the
    /// device's public key PDU entirely.
    ///
    /// [`provision`]: ProvisioningManager::provision
    pub fn set_oob_public_key(
        &self,
        device_uuid: &[u8; 16],
        public_xy: [u8; PUBLIC_KEY_XY_LEN],
    ) -> ProvisioningResult<()> {
        let mut sessions = self.sessions.write().unwrap();
        let session = sessions
            .get_mut(device_uuid)
            .ok_or(ProvisioningError::SessionNotFound)?;
        session.node.device_public_key = Some(public_xy);
        session.node.oob_public_key_used = true;
        Ok(())
    }

    /// Continue a session after capabilities arrived: send the start and
    /// public key PDUs with the caller's authentication choice.
    pub fn provision(
        &self,
        device_uuid: &[u8; 16],
        choice: AuthenticationChoice,
    ) -> ProvisioningResult<()> {
        let mut outgoing = Vec::new();
        let mut events = Vec::new();

        let result = (|| {
            let mut sessions = self.sessions.write().unwrap();
            let session = sessions
                .get_mut(device_uuid)
                .ok_or(ProvisioningError::SessionNotFound)?;
            if session.state != ProvisioningState::Capabilities {
                return Err(ProvisioningError::InvalidState("Start"));
            }

            // Nodes without a preassigned address get one here, sized by
            // the element count the device just reported
            if session.node.unicast_address == 0 {
                let element_count = session
                    .node
                    .element_count()
                    .ok_or(ProvisioningError::InvalidState("Start"))?;
                session.node.unicast_address = self.allocator.allocate(element_count)?;
                session.allocated_address = true;
            }

            session.node.auth_choice = Some(choice.clone());
            let (start_pdu, display_value) = state::build_start(&mut session.node)?;
            let key_pdu = state::build_public_key(&mut session.node)?;

            session.state = ProvisioningState::Start;
            events.push(ProvisioningEvent::StateChanged {
                state: ProvisioningState::Start,
                pdu: Some(start_pdu.clone()),
            });
            outgoing.push(start_pdu);

            session.state = ProvisioningState::PublicKey;
            events.push(ProvisioningEvent::StateChanged {
                state: ProvisioningState::PublicKey,
                pdu: Some(key_pdu.clone()),
            });
            outgoing.push(key_pdu);
            session.touch();

            // Input OOB value was pre-generated; show it now so the
            // user can start inputting while keys are exchanged
            if let Some(value) = display_value {
                events.push(ProvisioningEvent::DisplayAuthValue(value));
            }

            // With an OOB public key there is no key PDU to wait for;
            // move straight to the post-key-exchange step
            if session.node.oob_public_key_used {
                self.after_key_exchange(session, &mut outgoing, &mut events)?;
            }

            Ok(())
        })();

        if let Err(error) = result {
            return self.fail_session(device_uuid, error);
        }

        for pdu in &outgoing {
            self.send(device_uuid, pdu)?;
        }
        for event in events {
            self.notify(device_uuid, event)?;
        }
        Ok(())
    }

    /// Supply the value the user read off the device (output OOB).
    pub fn set_output_oob_value(
        &self,
        device_uuid: &[u8; 16],
        value: &str,
    ) -> ProvisioningResult<()> {
        let mut outgoing = Vec::new();
        let mut events = Vec::new();

        let result = (|| {
            let mut sessions = self.sessions.write().unwrap();
            let session = sessions
                .get_mut(device_uuid)
                .ok_or(ProvisioningError::SessionNotFound)?;

            let numeric = match session.node.auth_choice.as_ref() {
                Some(AuthenticationChoice::OutputOob { action, .. }) => action.is_numeric(),
                _ => return Err(ProvisioningError::InvalidState("Confirmation")),
            };
            if session.node.device_public_key.is_none() {
                return Err(ProvisioningError::InvalidState("PublicKey"));
            }

            session.node.auth_value = Some(if numeric {
                let number: u32 = value
                    .trim()
                    .parse()
                    .map_err(|_| ProvisioningError::AuthValueMissing)?;
                super::crypto::auth_value_numeric(number)
            } else {
                super::crypto::auth_value_alphanumeric(value.trim())?
            });

            self.send_confirmation(session, &mut outgoing, &mut events)
        })();

        if let Err(error) = result {
            return self.fail_session(device_uuid, error);
        }

        for pdu in &outgoing {
            self.send(device_uuid, pdu)?;
        }
        for event in events {
            self.notify(device_uuid, event)?;
        }
        Ok(())
    }

    /// Handle an incoming provisioning PDU for a session.
    ///
    /// Returns the finished node once the complete PDU arrives; the node
    /// then carries its device key and the session is closed.
    pub fn handle_pdu(
        &self,
        device_uuid: &[u8; 16],
        pdu: &[u8],
    ) -> ProvisioningResult<Option<UnprovisionedNode>> {
        let mut outgoing = Vec::new();
        let mut events = Vec::new();

        let result = (|| {
            let mut sessions = self.sessions.write().unwrap();
            let session = sessions
                .get_mut(device_uuid)
                .ok_or(ProvisioningError::SessionNotFound)?;

            if session.has_timed_out(self.timeout) {
                return Err(ProvisioningError::Timeout);
            }
            session.touch();

            // A failed PDU aborts from any state
            if pdu.len() >= PDU_HEADER_LEN
                && pdu[0] == PROVISIONING_PDU_TYPE
                && pdu[1] == TYPE_FAILED
            {
                let reason = state::parse_failed(pdu)?;
                warn!("device reported provisioning failure: {}", reason);
                return Err(ProvisioningError::PeerFailure(reason));
            }

            match session.state {
                ProvisioningState::Invite => {
                    state::parse_capabilities(&mut session.node, pdu)?;
                    session.state = ProvisioningState::Capabilities;
                    events.push(ProvisioningEvent::StateChanged {
                        state: ProvisioningState::Capabilities,
                        pdu: Some(pdu.to_vec()),
                    });
                    events.push(ProvisioningEvent::CapabilitiesReceived);
                    Ok(false)
                }
                ProvisioningState::PublicKey => {
                    state::parse_public_key(&mut session.node, pdu)?;
                    self.after_key_exchange(session, &mut outgoing, &mut events)?;
                    Ok(false)
                }
                ProvisioningState::InputComplete => {
                    state::expect_pdu(pdu, TYPE_INPUT_COMPLETE, "InputComplete")?;
                    self.send_confirmation(session, &mut outgoing, &mut events)?;
                    Ok(false)
                }
                ProvisioningState::Confirmation => {
                    state::parse_confirmation(&mut session.node, pdu)?;
                    let random_pdu = state::build_random(&session.node)?;
                    session.state = ProvisioningState::Random;
                    events.push(ProvisioningEvent::StateChanged {
                        state: ProvisioningState::Random,
                        pdu: Some(random_pdu.clone()),
                    });
                    outgoing.push(random_pdu);
                    Ok(false)
                }
                ProvisioningState::Random => {
                    state::parse_random(&mut session.node, pdu)?;
                    let data_pdu = state::build_data(&mut session.node)?;
                    session.state = ProvisioningState::Data;
                    events.push(ProvisioningEvent::StateChanged {
                        state: ProvisioningState::Data,
                        pdu: Some(data_pdu.clone()),
                    });
                    outgoing.push(data_pdu);
                    Ok(false)
                }
                ProvisioningState::Data => {
                    state::expect_pdu(pdu, TYPE_COMPLETE, "Data")?;
                    session.state = ProvisioningState::Complete;
                    events.push(ProvisioningEvent::StateChanged {
                        state: ProvisioningState::Complete,
                        pdu: Some(pdu.to_vec()),
                    });
                    events.push(ProvisioningEvent::Complete);
                    Ok(true)
                }
                _ => Err(ProvisioningError::UnexpectedPdu {
                    state: session.state.name(),
                    actual: pdu.get(1).copied().unwrap_or(0),
                }),
            }
        })();

        let completed = match result {
            Ok(completed) => completed,
            Err(error) => return Err(self.fail_session(device_uuid, error).unwrap_err()),
        };

        for pdu in &outgoing {
            self.send(device_uuid, pdu)?;
        }
        for event in events {
            self.notify(device_uuid, event)?;
        }

        if completed {
            let mut sessions = self.sessions.write().unwrap();
            if let Some(mut session) = sessions.remove(device_uuid) {
                // The device key stays; the caller needs it to configure
                // the new node
                session.node.wipe_secrets(true);
                info!(
                    "node {} provisioned at 0x{:04X}",
                    session.node.name, session.node.unicast_address
                );
                return Ok(Some(session.node));
            }
        }
        Ok(None)
    }

    /// Abort a session and discard its secrets.
    pub fn cancel(&self, device_uuid: &[u8; 16]) -> ProvisioningResult<()> {
        match self.fail_session(device_uuid, ProvisioningError::Canceled) {
            Err(ProvisioningError::Canceled) => Ok(()),
            other => other,
        }
    }

    /// Drop every session whose response deadline has passed.
    pub fn purge_timed_out(&self) -> Vec<[u8; 16]> {
        let expired: Vec<[u8; 16]> = {
            let sessions = self.sessions.read().unwrap();
            sessions
                .iter()
                .filter(|(_, session)| session.has_timed_out(self.timeout))
                .map(|(uuid, _)| *uuid)
                .collect()
        };

        for uuid in &expired {
            let _ = self.fail_session(uuid, ProvisioningError::Timeout);
        }
        expired
    }

    /// Whether a session is open for a device.
    pub fn has_session(&self, device_uuid: &[u8; 16]) -> bool {
        self.sessions.read().unwrap().contains_key(device_uuid)
    }

    /// The current state of a session, if one is open.
    pub fn session_state(&self, device_uuid: &[u8; 16]) -> Option<ProvisioningState> {
        self.sessions
            .read()
            .unwrap()
            .get(device_uuid)
            .map(|session| session.state)
    }

    /// Branch after both public keys are known: OOB methods pause for the
    /// user, everything else confirms immediately.
    fn after_key_exchange(
        &self,
        session: &mut ProvisioningSession,
        outgoing: &mut Vec<Vec<u8>>,
        events: &mut Vec<ProvisioningEvent>,
    ) -> ProvisioningResult<()> {
        let method = session
            .node
            .auth_choice
            .as_ref()
            .ok_or(ProvisioningError::InvalidState("PublicKey"))?
            .method();

        match method {
            AuthenticationMethod::OutputOob => {
                // The device is now outputting its value; wait for the
                // user to relay it
                events.push(ProvisioningEvent::AuthenticationRequired);
                Ok(())
            }
            AuthenticationMethod::InputOob => {
                session.state = ProvisioningState::InputComplete;
                events.push(ProvisioningEvent::StateChanged {
                    state: ProvisioningState::InputComplete,
                    pdu: None,
                });
                Ok(())
            }
            _ => self.send_confirmation(session, outgoing, events),
        }
    }

    fn send_confirmation(
        &self,
        session: &mut ProvisioningSession,
        outgoing: &mut Vec<Vec<u8>>,
        events: &mut Vec<ProvisioningEvent>,
    ) -> ProvisioningResult<()> {
        let pdu = state::build_confirmation(&mut session.node)?;
        session.state = ProvisioningState::Confirmation;
        events.push(ProvisioningEvent::StateChanged {
            state: ProvisioningState::Confirmation,
            pdu: Some(pdu.clone()),
        });
        outgoing.push(pdu);
        Ok(())
    }

    /// Tear a session down after an error: release its address block,
    /// wipe its secrets and report the failure.
    fn fail_session(
        &self,
        device_uuid: &[u8; 16],
        error: ProvisioningError,
    ) -> ProvisioningResult<()> {
        let removed = {
            let mut sessions = self.sessions.write().unwrap();
            sessions.remove(device_uuid)
        };

        if let Some(mut session) = removed {
            if session.allocated_address {
                if let Some(element_count) = session.node.element_count() {
                    self.allocator
                        .release(session.node.unicast_address, element_count);
                }
            }
            session.node.wipe_secrets(false);
            warn!("provisioning session for {} failed: {}", session.node.name, error);

            let _ = self.notify(
                device_uuid,
                ProvisioningEvent::StateChanged {
                    state: ProvisioningState::Failed,
                    pdu: None,
                },
            );
            let _ = self.notify(device_uuid, ProvisioningEvent::Failed(error.clone()));
        }

        Err(error)
    }

    fn send(&self, device_uuid: &[u8; 16], pdu: &[u8]) -> ProvisioningResult<()> {
        // The transport runs without the map lock held; it may re-enter
        // the manager (a loopback bearer, or cancel on a send error)
        let node = {
            let sessions = self.sessions.read().unwrap();
            match sessions.get(device_uuid) {
                Some(session) => session.node.clone(),
                // Session already closed (completion races a late send)
                None => return Ok(()),
            }
        };

        if let Err(error) = self.transport.send_provisioning_pdu(&node, pdu) {
            return self.fail_session(device_uuid, error);
        }
        Ok(())
    }

    fn notify(&self, device_uuid: &[u8; 16], event: ProvisioningEvent) -> ProvisioningResult<()> {
        let callback = {
            let event_callback = self.event_callback.lock().unwrap();
            event_callback.clone()
        };

        if let Some(callback) = callback {
            let mut callback = callback.lock().unwrap();
            callback(*device_uuid, event)?;
        }
        Ok(())
    }
}
