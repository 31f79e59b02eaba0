use std::collections::HashMap;
use std::hash::Hash;

use actix::Addr;

use crate::game::types::PlayerId;
use crate::server::game_session::session::GameSessionActor;

/// True if `addr` is the address registered for `key`.
pub fn is_addr_valid<K, V, A>(map: &HashMap<K, V>, key: &K, addr: &A, addr_extractor: impl Fn(&V) -> &A) -> bool
where
    K: Eq + Hash,
    A: PartialEq,
{
    map.get(key).is_some_and(|value| addr_extractor(value) == addr)
}

/// The value for `key`, only if `addr` is the address registered for it.
pub fn get_by_addr_mut<'a, K, V, A>(
    map: &'a mut HashMap<K, V>,
    key: &K,
    addr: &A,
    addr_extractor: impl Fn(&V) -> &A,
) -> Option<&'a mut V>
where
    K: Eq + Hash,
    A: PartialEq,
{
    map.get_mut(key).filter(|value| addr_extractor(value) == addr)
}

/// True if `addr` is the live game socket of `player_id`.
pub fn is_game_session_addr_valid(
    connections: &HashMap<PlayerId, Addr<GameSessionActor>>,
    player_id: &PlayerId,
    addr: &Addr<GameSessionActor>,
) -> bool {
    is_addr_valid(connections, player_id, addr, |a| a)
}
