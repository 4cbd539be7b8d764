// Device-to-player assignment: the slot table and its device index

use super::device::{Device, DeviceDirectory, DeviceId};
use super::event::ActionEvent;
use super::session::PlayerInputSession;
use super::AssignmentError;
use crate::engine::entity::EntitySpawner;
use log::{debug, info};
use std::collections::{BTreeSet, HashMap};

/// Result of a successful join request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    /// A new player joined in this slot
    Joined(usize),
    /// The device already belonged to the player in this slot
    AlreadyJoined(usize),
    /// The device was added to its keyboard/mouse partner's player in this slot
    Paired(usize),
}

impl JoinOutcome {
    pub fn player_index(self) -> usize {
        match self {
            Self::Joined(index) | Self::AlreadyJoined(index) | Self::Paired(index) => index,
        }
    }
}

enum SlotLookup {
    Bound(usize),
    Partner(usize),
    Free(usize),
    Full,
}

/// Fixed-capacity table of player slots plus a device → slot index.
///
/// Every device id in the index belongs to exactly one occupied slot's bound
/// device set, and every bound device of an occupied slot is in the index.
pub struct DeviceAssignmentRegistry<H> {
    /// Player slots, `None` when free
    slots: Vec<Option<PlayerInputSession<H>>>,

    /// Device → slot index
    device_slots: HashMap<DeviceId, usize>,

    /// Units per second at full movement input
    move_speed: f32,
}

impl<H> DeviceAssignmentRegistry<H> {
    /// Create a registry with `max_players` empty slots
    pub fn new(max_players: usize, move_speed: f32) -> Self {
        let mut slots = Vec::with_capacity(max_players);
        slots.resize_with(max_players, || None);

        Self {
            slots,
            device_slots: HashMap::new(),
            move_speed,
        }
    }

    /// Number of player slots
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied slots
    pub fn player_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// True if at least one slot is free
    pub fn can_join(&self) -> bool {
        self.slots.iter().any(Option::is_none)
    }

    /// True if [`try_join`](Self::try_join) would succeed for `device`.
    /// Unlike [`can_join`](Self::can_join) this also holds on a full table
    /// when the device is already bound or its keyboard/mouse partner is.
    pub fn can_accept(&self, device: DeviceId, directory: &DeviceDirectory) -> bool {
        !matches!(self.lookup_slot(device, directory), SlotLookup::Full)
    }

    /// Slot a device is bound to
    pub fn slot_of(&self, device: DeviceId) -> Option<usize> {
        self.device_slots.get(&device).copied()
    }

    /// Session in a slot
    pub fn session(&self, player_index: usize) -> Option<&PlayerInputSession<H>> {
        self.slots.get(player_index).and_then(Option::as_ref)
    }

    /// Mutable session in a slot
    pub fn session_mut(&mut self, player_index: usize) -> Option<&mut PlayerInputSession<H>> {
        self.slots.get_mut(player_index).and_then(Option::as_mut)
    }

    /// All joined sessions in slot order
    pub fn sessions(&self) -> impl Iterator<Item = &PlayerInputSession<H>> {
        self.slots.iter().flatten()
    }

    /// Bind a device to a new player.
    ///
    /// The designated keyboard and mouse join together as one player. If one
    /// of them already plays, the other is added to that player instead of
    /// taking a new slot. Joining a device that is already bound changes
    /// nothing. With no free slot the join is declined and nothing changes
    /// either.
    pub fn try_join<S>(
        &mut self,
        device: Device,
        directory: &DeviceDirectory,
        spawner: &mut S,
    ) -> Result<JoinOutcome, AssignmentError>
    where
        S: EntitySpawner<Handle = H>,
    {
        let player_index = match self.lookup_slot(device.id, directory) {
            SlotLookup::Bound(index) => return Ok(JoinOutcome::AlreadyJoined(index)),
            SlotLookup::Partner(index) => return Ok(self.pair(device.id, index)),
            SlotLookup::Free(index) => index,
            SlotLookup::Full => {
                return Err(AssignmentError::CapacityExhausted {
                    device: device.id,
                    max_players: self.capacity(),
                })
            }
        };

        let bound_devices = self.binding_set(device.id, directory);
        for &id in &bound_devices {
            self.device_slots.insert(id, player_index);
        }

        let entity = spawner.spawn(player_index);
        info!(
            "Player {} joined with {:?} device(s) {:?}",
            player_index, device.kind, bound_devices
        );
        self.slots[player_index] = Some(PlayerInputSession::new(player_index, bound_devices, entity));

        Ok(JoinOutcome::Joined(player_index))
    }

    /// Remove the player that owns `device`, releasing all its devices.
    /// Returns the freed slot, or `None` if the device was not bound.
    pub fn leave<S>(&mut self, device: DeviceId, spawner: &mut S) -> Option<usize>
    where
        S: EntitySpawner<Handle = H>,
    {
        let player_index = self.slot_of(device)?;
        let session = self.slots.get_mut(player_index)?.take()?;

        for id in session.bound_devices() {
            self.device_slots.remove(id);
        }

        info!(
            "Player {} left via device {}, released {:?}",
            player_index,
            device,
            session.bound_devices()
        );
        spawner.despawn(session.into_entity());

        Some(player_index)
    }

    /// Remove every player. Returns how many left.
    pub fn leave_all<S>(&mut self, spawner: &mut S) -> usize
    where
        S: EntitySpawner<Handle = H>,
    {
        let mut count = 0;
        for slot in &mut self.slots {
            if let Some(session) = slot.take() {
                spawner.despawn(session.into_entity());
                count += 1;
            }
        }
        self.device_slots.clear();
        count
    }

    /// Deliver an action event to the player owning its device.
    /// Returns false when no player owns the device.
    pub fn dispatch(&mut self, event: ActionEvent) -> bool {
        let device = event.device();
        let Some(player_index) = self.slot_of(device) else {
            debug!("Dropping {:?} from unassigned device {}", event, device);
            return false;
        };

        match self.session_mut(player_index) {
            Some(session) => {
                session.dispatch(event);
                true
            }
            None => false,
        }
    }

    /// Move every player's entity by its current input over `dt` seconds
    pub fn update<S>(&self, dt: f32, spawner: &mut S)
    where
        S: EntitySpawner<Handle = H>,
    {
        for session in self.sessions() {
            let delta = session.displacement(self.move_speed, dt);
            spawner.translate(session.entity(), delta);
        }
    }

    /// Slot already holding `device`, else its partner's slot, else the
    /// lowest free slot
    fn lookup_slot(&self, device: DeviceId, directory: &DeviceDirectory) -> SlotLookup {
        if let Some(index) = self.slot_of(device) {
            return SlotLookup::Bound(index);
        }
        if let Some(index) = self.partner_slot(device, directory) {
            return SlotLookup::Partner(index);
        }

        match self.slots.iter().position(Option::is_none) {
            Some(index) => SlotLookup::Free(index),
            None => SlotLookup::Full,
        }
    }

    /// Slot of the player owning the other half of the keyboard/mouse pair
    fn partner_slot(&self, device: DeviceId, directory: &DeviceDirectory) -> Option<usize> {
        let partner = if directory.keyboard() == Some(device) {
            directory.mouse()
        } else if directory.mouse() == Some(device) {
            directory.keyboard()
        } else {
            None
        };

        partner.and_then(|id| self.slot_of(id))
    }

    /// Add `device` to the occupied slot `player_index`
    fn pair(&mut self, device: DeviceId, player_index: usize) -> JoinOutcome {
        if let Some(session) = self.session_mut(player_index) {
            session.bind(device);
            self.device_slots.insert(device, player_index);
            info!("Device {} paired with player {}", device, player_index);
        }
        JoinOutcome::Paired(player_index)
    }

    /// Devices a new player joining with `device` will own
    fn binding_set(&self, device: DeviceId, directory: &DeviceDirectory) -> BTreeSet<DeviceId> {
        let mut devices = BTreeSet::from([device]);

        if directory.is_pointer_pair(device) {
            devices.extend([directory.keyboard(), directory.mouse()].into_iter().flatten());
        }

        devices
    }
}
