//! Generated resource names.
//!
//! Every generated name ends in random lowercase hex so that repeated runs in
//! the same subscription do not collide. Storage account names must be
//! globally unique, 3-24 characters, lowercase letters and digits only; the
//! generated ones stay within that limit when the group name is generated too.

const HEX: &[u8; 16] = b"0123456789abcdef";

/// `len` random lowercase hex digits.
pub fn random_hex(len: usize) -> String {
    (0..len)
        .map(|_| char::from(HEX[fastrand::usize(..HEX.len())]))
        .collect()
}

pub fn resource_group() -> String {
    format!("grp{}", random_hex(8))
}

pub fn storage_account(resource_group: &str) -> String {
    format!("{resource_group}accnt{}", random_hex(8))
}

pub fn availability_set() -> String {
    format!("av-{}", random_hex(8))
}

pub fn virtual_network(resource_group: &str) -> String {
    format!("{resource_group}vnet")
}

pub fn subnet(resource_group: &str) -> String {
    format!("{resource_group}subnet")
}

/// Public IP and NIC names share one suffix: `ip0<hex4>`, `nic0<hex4>`.
pub fn public_ip_and_nic() -> (String, String) {
    let suffix = random_hex(4);
    (format!("ip0{suffix}"), format!("nic0{suffix}"))
}

pub fn virtual_machine() -> String {
    format!("vm{}", random_hex(8))
}

pub fn os_disk() -> String {
    format!("osdisk{}", random_hex(4))
}

pub fn data_disk() -> String {
    format!("ddisk{}", random_hex(4))
}
