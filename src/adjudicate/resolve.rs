//! Simultaneous movement resolution.
//!
//! Resolves a batch of validated orders with no order adjudicated in
//! isolation: interval-valued strengths (a pessimistic and an optimistic
//! bound) are recomputed until the order set reaches a fixed point, then a
//! dependency-guided pass settles the rest. Dependency cycles fall back to
//! guess-and-check: an all-move cycle rotates successfully, a convoy
//! paradox is settled by failing the convoyed moves in the cycle (the
//! Szykman rule). Strict inequality over the pessimistic bound is required
//! to win anything, so equal-strength contenders all fail.

use crate::world::{Location, OrderKind, OrderStatus, World};

use super::adjacency::Adjacency;
use super::convoy;

/// An interval strength: the resolved bound from below and above.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Strength {
    min: i32,
    max: i32,
}

/// Movement resolver over the active order set.
///
/// All bookkeeping is indexed by position in `World::orders`; the world is
/// the single source of truth for statuses, and terminal statuses are never
/// overwritten.
pub struct MovementResolver<'w, 'a> {
    world: &'w mut World,
    adjacency: &'a Adjacency<'a>,
    /// Active orders, ascending by index.
    orders: Vec<usize>,
    /// Non-invalid moves, supports, convoys within the active set.
    moves: Vec<usize>,
    supports: Vec<usize>,
    convoys: Vec<usize>,
    /// Whether each move could also travel without a convoy.
    direct_ok: Vec<bool>,
    /// Head-to-head counterpart for each move.
    opposing: Vec<Option<usize>>,
    /// Supports backing each order.
    supports_of: Vec<Vec<usize>>,
    /// Convoys currently carrying each move.
    convoy_path: Vec<Vec<usize>>,
    /// Convoys still able to provide a path.
    can_provide_path: Vec<bool>,
    /// Moves failed by the Szykman rule; they no longer attack or prevent.
    szykman: Vec<bool>,
    hold: Vec<Strength>,
    attack: Vec<Strength>,
    defend: Vec<Strength>,
    prevent: Vec<Strength>,
}

impl<'w, 'a> MovementResolver<'w, 'a> {
    /// Prepares the resolver for the given active order indices.
    pub fn new(world: &'w mut World, adjacency: &'a Adjacency<'a>, active: &[usize]) -> Self {
        let n = world.orders.len();
        let mut orders: Vec<usize> = active.to_vec();
        orders.sort_unstable();
        orders.dedup();

        let mut moves = Vec::new();
        let mut supports = Vec::new();
        let mut convoys = Vec::new();
        for &i in &orders {
            let order = &world.orders[i];
            if order.status.is_invalid() {
                continue;
            }
            match order.kind {
                OrderKind::Move { .. } => moves.push(i),
                OrderKind::Support { .. } => supports.push(i),
                OrderKind::Convoy { .. } => convoys.push(i),
                _ => {}
            }
        }

        let mut resolver = MovementResolver {
            world,
            adjacency,
            orders,
            moves,
            supports,
            convoys,
            direct_ok: vec![false; n],
            opposing: vec![None; n],
            supports_of: vec![Vec::new(); n],
            convoy_path: vec![Vec::new(); n],
            can_provide_path: vec![false; n],
            szykman: vec![false; n],
            hold: vec![Strength::default(); n],
            attack: vec![Strength::default(); n],
            defend: vec![Strength::default(); n],
            prevent: vec![Strength::default(); n],
        };
        resolver.link_orders();
        resolver
    }

    /// Precomputes direct reachability, head-to-head pairs, and which
    /// supports back which orders.
    fn link_orders(&mut self) {
        for &c in &self.convoys {
            self.can_provide_path[c] = true;
        }

        for &m in &self.moves {
            let order = &self.world.orders[m];
            if let Some(destination) = order.move_destination() {
                self.direct_ok[m] = self.adjacency.is_valid_direct_move(
                    order.unit_kind,
                    false,
                    &order.location,
                    destination,
                );
            }
        }

        for &m in &self.moves {
            if !self.direct_ok[m] {
                continue;
            }
            let location = self.world.orders[m].location.clone();
            let destination = match self.world.orders[m].move_destination() {
                Some(d) => d.clone(),
                None => continue,
            };
            let opposing = self.moves.iter().copied().find(|&o| {
                o != m && self.direct_ok[o] && {
                    let other = &self.world.orders[o];
                    self.adjacency.equals_or_related(&other.location, &destination)
                        && other
                            .move_destination()
                            .map(|d| self.adjacency.equals_or_related(d, &location))
                            .unwrap_or(false)
                }
            });
            self.opposing[m] = opposing;
        }

        for &s in &self.supports {
            let (midpoint, destination) = match &self.world.orders[s].kind {
                OrderKind::Support {
                    midpoint,
                    destination,
                } => (midpoint.clone(), destination.clone()),
                _ => continue,
            };
            if midpoint == destination {
                // Support to hold: backs any stationary order at the midpoint.
                for &i in &self.orders {
                    let order = &self.world.orders[i];
                    if order.is_move() || order.status.is_invalid() {
                        continue;
                    }
                    if self.adjacency.equals_or_related(&order.location, &midpoint) {
                        self.supports_of[i].push(s);
                    }
                }
            } else {
                for &m in &self.moves {
                    let order = &self.world.orders[m];
                    if order.location == midpoint
                        && order
                            .move_destination()
                            .map(|d| self.adjacency.equals_or_related(d, &destination))
                            .unwrap_or(false)
                    {
                        self.supports_of[m].push(s);
                    }
                }
            }
        }
    }

    /// Runs resolution to completion over the active set.
    pub fn resolve(&mut self) {
        self.initial_pass();

        loop {
            let unresolved: Vec<usize> = self.unresolved_orders();
            if unresolved.is_empty() {
                break;
            }
            for &i in &unresolved {
                let mut stack = Vec::new();
                self.resolve_order_rec(i, &mut stack);
            }
            if self.unresolved_orders() == unresolved {
                break;
            }
        }

        self.update_dependent_orders();
    }

    fn unresolved_orders(&self) -> Vec<usize> {
        self.orders
            .iter()
            .copied()
            .filter(|&i| self.world.orders[i].status == OrderStatus::New)
            .collect()
    }

    fn status(&self, i: usize) -> OrderStatus {
        self.world.orders[i].status
    }

    /// Writes a status, refusing to revisit terminal statuses. A move or
    /// hold that fails drags its supports (and, for moves, its convoys)
    /// down with it.
    fn set_status(&mut self, i: usize, status: OrderStatus) {
        if self.world.orders[i].status != OrderStatus::New {
            return;
        }
        self.world.orders[i].status = status;

        if status == OrderStatus::Failure {
            match self.world.orders[i].kind {
                OrderKind::Move { .. } => {
                    for s in self.supports_of[i].clone() {
                        self.set_status(s, OrderStatus::Failure);
                    }
                    for c in self.convoy_path[i].clone() {
                        self.set_status(c, OrderStatus::Failure);
                    }
                }
                OrderKind::Hold => {
                    for s in self.supports_of[i].clone() {
                        self.set_status(s, OrderStatus::Failure);
                    }
                }
                _ => {}
            }
        }
    }

    /// Iterates resolve-and-update until no status changes.
    fn initial_pass(&mut self) {
        self.update_convoy_paths();
        self.update_strengths();

        loop {
            let before: Vec<OrderStatus> = self.orders.iter().map(|&i| self.status(i)).collect();

            self.update_self_attacking_supports();
            for idx in 0..self.orders.len() {
                let i = self.orders[idx];
                self.try_resolve(i);
            }

            self.update_convoy_paths();
            self.update_strengths();

            let after: Vec<OrderStatus> = self.orders.iter().map(|&i| self.status(i)).collect();
            if before == after {
                break;
            }
        }
    }

    /// Recomputes each move's current convoy path; a move with no path and
    /// no direct route fails outright.
    fn update_convoy_paths(&mut self) {
        for idx in 0..self.moves.len() {
            let m = self.moves[idx];
            let location = self.world.orders[m].location.clone();
            let destination = match self.world.orders[m].move_destination() {
                Some(d) => d.clone(),
                None => continue,
            };

            let mut fleet_indices = Vec::new();
            let mut fleet_locations = Vec::new();
            for &c in &self.convoys {
                if !self.can_provide_path[c] {
                    continue;
                }
                if let OrderKind::Convoy {
                    midpoint,
                    destination: convoy_destination,
                } = &self.world.orders[c].kind
                {
                    if *midpoint == location && *convoy_destination == destination {
                        fleet_indices.push(c);
                        fleet_locations.push(self.world.orders[c].location.clone());
                    }
                }
            }

            let on_path = convoy::possible_convoys(
                self.adjacency,
                &location,
                &destination,
                &fleet_locations,
            );
            let path: Vec<usize> = on_path.into_iter().map(|i| fleet_indices[i]).collect();

            if path.is_empty() && !self.direct_ok[m] {
                self.set_status(m, OrderStatus::Failure);
            }
            self.convoy_path[m] = path;
        }
    }

    fn update_strengths(&mut self) {
        for idx in 0..self.orders.len() {
            let i = self.orders[idx];
            if self.world.orders[i].is_move() {
                self.update_move_strengths(i);
            } else {
                self.update_hold_strength(i);
            }
        }
    }

    /// Adds the given supports to a strength: a settled support counts in
    /// both bounds, an undecided one only optimistically.
    fn add_support_strength(&self, strength: &mut Strength, supports: &[usize], max_only: bool) {
        for &s in supports {
            match self.status(s) {
                OrderStatus::Success => {
                    if !max_only {
                        strength.min += 1;
                    }
                    strength.max += 1;
                }
                OrderStatus::New => strength.max += 1,
                _ => {}
            }
        }
    }

    fn update_hold_strength(&mut self, i: usize) {
        let mut strength = Strength { min: 1, max: 1 };
        self.add_support_strength(&mut strength, &self.supports_of[i].clone(), false);
        self.hold[i] = strength;
    }

    fn update_move_strengths(&mut self, m: usize) {
        self.update_move_hold_strength(m);
        self.update_move_defend_strength(m);
        self.update_move_attack_strength(m);
        self.update_move_prevent_strength(m);
    }

    /// How hard the moving unit's own location is to take while the move
    /// remains unresolved.
    fn update_move_hold_strength(&mut self, m: usize) {
        self.hold[m] = match self.status(m) {
            // The unit is leaving; its location defends at zero.
            OrderStatus::Success => Strength { min: 0, max: 0 },
            OrderStatus::Invalid => {
                let mut strength = Strength { min: 1, max: 1 };
                self.add_support_strength(&mut strength, &self.supports_of[m].clone(), false);
                strength
            }
            OrderStatus::Failure => Strength { min: 1, max: 1 },
            OrderStatus::New => Strength { min: 0, max: 1 },
            _ => self.hold[m],
        };
    }

    fn update_move_defend_strength(&mut self, m: usize) {
        let mut strength = Strength { min: 1, max: 1 };
        self.add_support_strength(&mut strength, &self.supports_of[m].clone(), false);
        self.defend[m] = strength;
    }

    fn update_move_attack_strength(&mut self, m: usize) {
        if matches!(self.status(m), OrderStatus::Invalid | OrderStatus::Failure) {
            self.attack[m] = Strength { min: 0, max: 0 };
            return;
        }

        let mut strength = Strength { min: 1, max: 1 };

        let path = self.convoy_path[m].clone();
        if path.iter().any(|&c| self.status(c) == OrderStatus::New) {
            strength.min = 0;
            if path.iter().any(|&c| self.status(c) == OrderStatus::Failure) {
                strength.max = 0;
                self.attack[m] = strength;
                return;
            }
        }

        let destination = match self.world.orders[m].move_destination() {
            Some(d) => d.clone(),
            None => return,
        };
        let supports = self.supports_of[m].clone();
        let owner = self.world.orders[m].owner;

        let Some(d) = self.order_at_related(&destination) else {
            self.add_support_strength(&mut strength, &supports, false);
            self.attack[m] = strength;
            return;
        };

        let defender = &self.world.orders[d];
        let defender_owner = defender.owner;
        let defender_is_move = defender.is_move();
        let defender_status = defender.status;

        if defender_owner == owner {
            // Own unit at the destination: only succeed behind it if it
            // leaves, and never dislodge it.
            if defender_is_move {
                if matches!(
                    defender_status,
                    OrderStatus::Failure | OrderStatus::Invalid
                ) {
                    self.attack[m] = Strength { min: 0, max: 0 };
                    return;
                }
                self.add_support_strength(&mut strength, &supports, false);
                if defender_status == OrderStatus::New {
                    strength.min = 0;
                }
            } else {
                strength = Strength { min: 0, max: 0 };
            }
            self.attack[m] = strength;
            return;
        }

        if defender_status == OrderStatus::Success {
            self.add_support_strength(&mut strength, &supports, false);
            self.attack[m] = strength;
            return;
        }

        let defender_convoyed =
            defender_is_move && self.convoy_path[d].iter().any(|&c| self.can_provide_path[c]);
        if defender_convoyed {
            self.add_support_strength(&mut strength, &supports, false);
            self.attack[m] = strength;
            return;
        }

        // Supports from the defender's own nation can never force its
        // dislodgement; they only count if the defender vacates.
        let different_owner: Vec<usize> = supports
            .iter()
            .copied()
            .filter(|&s| self.world.orders[s].owner != defender_owner)
            .collect();
        let same_owner: Vec<usize> = supports
            .iter()
            .copied()
            .filter(|&s| self.world.orders[s].owner == defender_owner)
            .collect();

        if !defender_is_move
            || matches!(defender_status, OrderStatus::Invalid | OrderStatus::Failure)
        {
            self.add_support_strength(&mut strength, &different_owner, false);
        } else {
            self.add_support_strength(&mut strength, &different_owner, false);
            self.add_support_strength(&mut strength, &same_owner, true);
        }
        self.attack[m] = strength;
    }

    fn update_move_prevent_strength(&mut self, m: usize) {
        if self.status(m) == OrderStatus::Invalid {
            self.prevent[m] = Strength { min: 0, max: 0 };
            return;
        }

        let mut strength = Strength { min: 1, max: 1 };
        let path = self.convoy_path[m].clone();

        if !self.direct_ok[m] && path.iter().all(|&c| !self.can_provide_path[c]) {
            self.prevent[m] = Strength { min: 0, max: 0 };
            return;
        }

        if path.iter().any(|&c| self.status(c) == OrderStatus::New) {
            strength.min = 0;
            if path.iter().any(|&c| self.status(c) == OrderStatus::Failure) {
                strength.max = 0;
            }
            self.prevent[m] = strength;
            return;
        }

        if let Some(o) = self.opposing[m] {
            if self.status(o) == OrderStatus::Success {
                self.prevent[m] = Strength { min: 0, max: 0 };
                return;
            }
        }

        self.add_support_strength(&mut strength, &self.supports_of[m].clone(), false);

        if let Some(o) = self.opposing[m] {
            if self.status(o) == OrderStatus::New {
                strength.min = 0;
            }
        }
        self.prevent[m] = strength;
    }

    /// First active order whose location names the given cell (up to the
    /// coast/parent relation).
    fn order_at_related(&self, location: &Location) -> Option<usize> {
        self.orders
            .iter()
            .copied()
            .find(|&i| self.adjacency.equals_or_related(&self.world.orders[i].location, location))
    }

    fn try_resolve(&mut self, i: usize) {
        if self.status(i) != OrderStatus::New {
            return;
        }
        match self.world.orders[i].kind {
            OrderKind::Hold => self.try_resolve_hold(i),
            OrderKind::Move { .. } => self.try_resolve_move(i),
            OrderKind::Support { .. } => self.try_resolve_support(i),
            OrderKind::Convoy { .. } => self.try_resolve_convoy(i),
            _ => {}
        }
    }

    /// Moves (other than `except`) attacking the given location.
    fn attacking_moves(&self, location: &Location, except: Option<usize>) -> Vec<usize> {
        self.moves
            .iter()
            .copied()
            .filter(|&m| {
                Some(m) != except
                    && !self.szykman[m]
                    && self.world.orders[m]
                        .move_destination()
                        .map(|d| self.adjacency.equals_or_related(d, location))
                        .unwrap_or(false)
            })
            .collect()
    }

    fn try_resolve_hold(&mut self, h: usize) {
        let location = self.world.orders[h].location.clone();
        let attacking = self.attacking_moves(&location, None);

        if attacking.iter().any(|&m| self.status(m) == OrderStatus::Success) {
            self.set_status(h, OrderStatus::Failure);
        } else if attacking.iter().all(|&m| self.status(m) == OrderStatus::Failure) {
            self.set_status(h, OrderStatus::Success);
        }
    }

    fn try_resolve_move(&mut self, m: usize) {
        let destination = match self.world.orders[m].move_destination() {
            Some(d) => d.clone(),
            None => return,
        };
        let competing = self.attacking_moves(&destination, Some(m));

        let competing_prevent_max = competing
            .iter()
            .map(|&o| self.prevent[o].max)
            .max()
            .unwrap_or(0);
        let competing_prevent_min = competing
            .iter()
            .map(|&o| self.prevent[o].min)
            .max()
            .unwrap_or(0);
        let beats_prevent = self.attack[m].min > competing_prevent_max;
        let loses_to_prevent = self.attack[m].max <= competing_prevent_min;

        if let Some(o) = self.opposing[m] {
            if !self.szykman[o] {
                let beats_defend = self.attack[m].min > self.defend[o].max;
                let loses_to_defend = self.attack[m].max <= self.defend[o].min;

                if beats_defend && beats_prevent {
                    self.set_status(m, OrderStatus::Success);
                } else if loses_to_defend || loses_to_prevent {
                    self.set_status(m, OrderStatus::Failure);
                }
                return;
            }
        }

        let destination_order = self.order_at_related(&destination);

        // A friendly unit moving out of the destination, opposed only by
        // its own head-to-head enemy: follow it in iff it wins.
        if let Some(d) = destination_order {
            let defender = &self.world.orders[d];
            if defender.is_move()
                && defender.owner == self.world.orders[m].owner
                && self.opposing[d].is_some()
                && competing.iter().all(|&c| Some(c) == self.opposing[d])
            {
                if self.status(d) == OrderStatus::Success {
                    self.set_status(m, OrderStatus::Success);
                }
                return;
            }
        }

        let hold_max = destination_order.map(|d| self.hold[d].max).unwrap_or(0);
        let hold_min = destination_order.map(|d| self.hold[d].min).unwrap_or(0);
        let beats_hold = self.attack[m].min > hold_max;
        let loses_to_hold = self.attack[m].max <= hold_min;

        if beats_hold && beats_prevent {
            self.set_status(m, OrderStatus::Success);
        } else if loses_to_hold || loses_to_prevent {
            self.set_status(m, OrderStatus::Failure);
        }
    }

    fn try_resolve_support(&mut self, s: usize) {
        let location = self.world.orders[s].location.clone();
        let destination = match &self.world.orders[s].kind {
            OrderKind::Support { destination, .. } => destination.clone(),
            _ => return,
        };
        let owner = self.world.orders[s].owner;
        let attacking = self.attacking_moves(&location, None);

        // Harmless attackers: own units, failed attacks out of the
        // supported destination, and convoy moves with no path at all.
        let all_harmless = attacking.iter().all(|&m| {
            let attacker = &self.world.orders[m];
            attacker.owner == owner
                || (self.adjacency.equals_or_related(&attacker.location, &destination)
                    && self.status(m) == OrderStatus::Failure)
                || (!self.direct_ok[m] && self.convoy_path[m].is_empty())
        });
        if all_harmless {
            self.set_status(s, OrderStatus::Success);
            return;
        }

        if attacking.iter().any(|&m| self.status(m) == OrderStatus::Success) {
            self.set_status(s, OrderStatus::Failure);
            return;
        }

        // A convoyed attack with an intact path cuts the support.
        if attacking.iter().any(|&m| {
            !self.direct_ok[m]
                && self.convoy_path[m]
                    .iter()
                    .all(|&c| self.status(c) == OrderStatus::Success)
        }) {
            self.set_status(s, OrderStatus::Failure);
        }

        // A direct attack from a third party cuts the support even when the
        // attack itself is going to fail.
        if attacking.iter().any(|&m| {
            let attacker = &self.world.orders[m];
            attacker.owner != owner
                && self.status(m) == OrderStatus::Failure
                && self.direct_ok[m]
                && !self.adjacency.equals_or_related(&attacker.location, &destination)
                && self.convoy_path[m]
                    .iter()
                    .all(|&c| self.status(c) != OrderStatus::New && self.can_provide_path[c])
        }) {
            self.set_status(s, OrderStatus::Failure);
        }
    }

    fn try_resolve_convoy(&mut self, c: usize) {
        let location = self.world.orders[c].location.clone();
        let attacking: Vec<usize> = self
            .moves
            .iter()
            .copied()
            .filter(|&m| self.world.orders[m].move_destination() == Some(&location))
            .collect();

        if attacking.iter().all(|&m| self.status(m) == OrderStatus::Failure) {
            self.set_status(c, OrderStatus::Success);
            return;
        }
        if attacking.iter().any(|&m| self.status(m) == OrderStatus::Success) {
            self.set_status(c, OrderStatus::Failure);
            self.can_provide_path[c] = false;
        }
    }

    /// Supporting an attack onto a stationary unit of one's own nation is
    /// void.
    fn update_self_attacking_supports(&mut self) {
        for idx in 0..self.supports.len() {
            let s = self.supports[idx];
            let (midpoint, destination) = match &self.world.orders[s].kind {
                OrderKind::Support {
                    midpoint,
                    destination,
                } => (midpoint.clone(), destination.clone()),
                _ => continue,
            };
            if midpoint == destination {
                continue;
            }
            let Some(d) = self.order_at_related(&destination) else {
                continue;
            };
            let defender = &self.world.orders[d];
            if defender.owner != self.world.orders[s].owner {
                continue;
            }
            if !defender.is_move()
                || matches!(
                    defender.status,
                    OrderStatus::Invalid | OrderStatus::Failure
                )
            {
                self.set_status(s, OrderStatus::Failure);
            }
        }
    }

    /// Orders whose resolution this order's outcome feeds into.
    fn dependents(&self, i: usize) -> Vec<usize> {
        let order = &self.world.orders[i];
        match &order.kind {
            OrderKind::Hold => {
                let location = &order.location;
                self.supports
                    .iter()
                    .copied()
                    .filter(|&s| match &self.world.orders[s].kind {
                        OrderKind::Support { destination, .. } => destination == location,
                        _ => false,
                    })
                    .collect()
            }
            OrderKind::Move { destination } => {
                let mut result: Vec<usize> = self
                    .moves
                    .iter()
                    .copied()
                    .filter(|&m| {
                        self.adjacency
                            .equals_or_related(&self.world.orders[m].location, destination)
                    })
                    .collect();
                result.extend(self.supports_of[i].iter().copied());
                result.extend(self.convoy_path[i].iter().copied());
                result
            }
            OrderKind::Support { .. } => {
                let location = &order.location;
                let mut result: Vec<usize> = self
                    .supports
                    .iter()
                    .copied()
                    .filter(|&s| match &self.world.orders[s].kind {
                        OrderKind::Support { midpoint, .. } => {
                            self.adjacency.equals_or_related(midpoint, location)
                        }
                        _ => false,
                    })
                    .collect();
                for &m in &self.moves {
                    let into_supporter = self.world.orders[m]
                        .move_destination()
                        .map(|d| self.adjacency.equals_or_related(d, location))
                        .unwrap_or(false);
                    if into_supporter {
                        result.push(m);
                    }
                }
                result
            }
            OrderKind::Convoy { .. } => {
                let location = &order.location;
                let mut result: Vec<usize> = self
                    .moves
                    .iter()
                    .copied()
                    .filter(|&m| self.world.orders[m].move_destination() == Some(location))
                    .collect();
                result.extend(self.supports.iter().copied().filter(|&s| {
                    match &self.world.orders[s].kind {
                        OrderKind::Support { destination, .. } => destination == location,
                        _ => false,
                    }
                }));
                result
            }
            _ => Vec::new(),
        }
    }

    fn resolve_order_rec(&mut self, i: usize, stack: &mut Vec<usize>) {
        if stack.contains(&i) {
            self.apply_backup_rule(stack);
            return;
        }

        self.update_convoy_paths();
        self.update_strengths();
        self.try_resolve(i);

        if self.status(i) != OrderStatus::New {
            return;
        }

        let dependents = self.dependents(i);
        stack.push(i);
        for d in dependents {
            self.resolve_order_rec(d, stack);
        }
        stack.retain(|&x| x != i);
    }

    /// Breaks a dependency cycle: keep the uniquely consistent guess for
    /// the head order; rotate all-move cycles; otherwise apply the Szykman
    /// rule to the convoyed moves in the cycle.
    fn apply_backup_rule(&mut self, stack: &[usize]) {
        let head = stack[0];

        let consistent_success = self.try_guess(head, OrderStatus::Success);
        let consistent_failure = self.try_guess(head, OrderStatus::Failure);

        if consistent_success && !consistent_failure {
            self.set_status(head, OrderStatus::Success);
            self.resolve_order_rec(head, &mut Vec::new());
        } else if consistent_failure && !consistent_success {
            self.set_status(head, OrderStatus::Failure);
            self.resolve_order_rec(head, &mut Vec::new());
        } else if !consistent_success && !consistent_failure {
            self.apply_szykman_rule(head, stack);
        } else {
            let cycle_moves: Vec<usize> = stack
                .iter()
                .copied()
                .filter(|&i| self.world.orders[i].is_move())
                .collect();
            let is_cycle = cycle_moves.iter().all(|&m| {
                let destination = self.world.orders[m].move_destination();
                cycle_moves.iter().any(|&next| {
                    destination
                        .map(|d| {
                            self.adjacency
                                .equals_or_related(&self.world.orders[next].location, d)
                        })
                        .unwrap_or(false)
                })
            });

            if is_cycle {
                self.set_status(head, OrderStatus::Success);
                self.resolve_order_rec(head, &mut Vec::new());
            } else {
                self.apply_szykman_rule(head, stack);
            }
        }
    }

    /// Tests whether guessing a status for the order survives re-resolution.
    fn try_guess(&mut self, i: usize, guess: OrderStatus) -> bool {
        let snapshot: Vec<OrderStatus> = self.world.orders.iter().map(|o| o.status).collect();

        self.set_status(i, guess);
        self.resolve_order_rec(i, &mut Vec::new());
        let consistent = self.status(i) == guess;

        for (order, status) in self.world.orders.iter_mut().zip(snapshot) {
            order.status = status;
        }
        consistent
    }

    /// Szykman rule: the convoyed moves in the paradox cycle fail and are
    /// treated as holding, which makes the rest of the cycle resolvable.
    /// Re-resolves only when a move actually failed, so an unbreakable
    /// cycle falls through to the final failure sweep instead of looping.
    fn apply_szykman_rule(&mut self, head: usize, stack: &[usize]) {
        let mut changed = false;
        for &i in stack {
            if self.world.orders[i].is_move()
                && !self.convoy_path[i].is_empty()
                && self.status(i) == OrderStatus::New
            {
                self.set_status(i, OrderStatus::Failure);
                self.szykman[i] = true;
                changed = true;
            }
        }
        if changed {
            self.resolve_order_rec(head, &mut Vec::new());
        }
    }

    /// A settled order drags dependent orders with it: supports of a failed
    /// hold or move fail, convoys of a failed move fail.
    fn update_dependent_orders(&mut self) {
        for idx in 0..self.supports.len() {
            let s = self.supports[idx];
            let midpoint = match &self.world.orders[s].kind {
                OrderKind::Support { midpoint, .. } => midpoint.clone(),
                _ => continue,
            };
            if let Some(supported) = self.order_at_related(&midpoint) {
                let order = &self.world.orders[supported];
                if matches!(order.kind, OrderKind::Hold | OrderKind::Move { .. })
                    && order.status == OrderStatus::Failure
                {
                    self.set_status(s, OrderStatus::Failure);
                }
            }
        }

        for idx in 0..self.convoys.len() {
            let c = self.convoys[idx];
            let midpoint = match &self.world.orders[c].kind {
                OrderKind::Convoy { midpoint, .. } => midpoint.clone(),
                _ => continue,
            };
            if let Some(convoyed) = self.order_at_related(&midpoint) {
                if self.world.orders[convoyed].status == OrderStatus::Failure {
                    self.set_status(c, OrderStatus::Failure);
                }
            }
        }
    }
}
