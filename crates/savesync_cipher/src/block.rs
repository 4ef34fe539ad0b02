//! AES-128 key schedule and single-block transforms.
//!
//! Every function here works on values owned by the caller: the key schedule
//! is an immutable [`RoundKeys`] value and the 4×4 working state lives on the
//! stack of one [`encrypt_block`] / [`decrypt_block`] call. Concurrent calls
//! from independent threads never share mutable state.

use crate::tables::{INV_SBOX, RCON, SBOX};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Size of one AES block in bytes.
pub const BLOCK_SIZE: usize = 16;

/// Size of an AES-128 key in bytes.
pub const KEY_SIZE: usize = 16;

/// Number of columns in the state.
const NB: usize = 4;
/// Number of 32-bit words in the key.
const NK: usize = KEY_SIZE / 4;
/// Number of rounds for a 128-bit key.
const NR: usize = 10;

/// Size of the expanded key schedule in bytes.
pub const ROUND_KEYS_SIZE: usize = NB * (NR + 1) * 4;

/// Working state, indexed as `state[column][row]`.
///
/// Byte `i` of a block maps to column `i / 4`, row `i % 4`.
type State = [[u8; 4]; 4];

/// Expanded AES-128 key schedule.
///
/// Derived once per key and reused for any number of block operations.
/// The schedule is zeroized when dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct RoundKeys {
    bytes: [u8; ROUND_KEYS_SIZE],
}

impl RoundKeys {
    /// Expands a 16-byte key into the full round key schedule.
    #[must_use]
    pub fn expand(key: &[u8; KEY_SIZE]) -> Self {
        let mut bytes = [0u8; ROUND_KEYS_SIZE];
        bytes[..KEY_SIZE].copy_from_slice(key);

        for word in NK..NB * (NR + 1) {
            let mut temp = [0u8; 4];
            temp.copy_from_slice(&bytes[(word - 1) * 4..word * 4]);

            if word % NK == 0 {
                temp.rotate_left(1);
                sub_word(&mut temp);
                temp[0] ^= RCON[word / NK];
            } else if NK > 6 && word % NK == 4 {
                // Only reachable for 256-bit keys; kept so the recurrence
                // matches the general Rijndael schedule.
                sub_word(&mut temp);
            }

            for (j, t) in temp.iter().enumerate() {
                bytes[word * 4 + j] = bytes[(word - NK) * 4 + j] ^ t;
            }
        }

        Self { bytes }
    }

    /// Returns the raw schedule bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; ROUND_KEYS_SIZE] {
        &self.bytes
    }

    fn round_key(&self, round: usize) -> &[u8] {
        let start = round * NB * 4;
        &self.bytes[start..start + NB * 4]
    }
}

impl std::fmt::Debug for RoundKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoundKeys")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Encrypts a single 16-byte block.
#[must_use]
pub fn encrypt_block(keys: &RoundKeys, block: &[u8; BLOCK_SIZE]) -> [u8; BLOCK_SIZE] {
    let mut state = load_state(block);

    add_round_key(&mut state, keys, 0);

    for round in 1..NR {
        sub_bytes(&mut state);
        shift_rows(&mut state);
        mix_columns(&mut state);
        add_round_key(&mut state, keys, round);
    }

    // Final round has no MixColumns.
    sub_bytes(&mut state);
    shift_rows(&mut state);
    add_round_key(&mut state, keys, NR);

    store_state(&state)
}

/// Decrypts a single 16-byte block.
#[must_use]
pub fn decrypt_block(keys: &RoundKeys, block: &[u8; BLOCK_SIZE]) -> [u8; BLOCK_SIZE] {
    let mut state = load_state(block);

    add_round_key(&mut state, keys, NR);

    for round in (1..NR).rev() {
        inv_shift_rows(&mut state);
        inv_sub_bytes(&mut state);
        add_round_key(&mut state, keys, round);
        inv_mix_columns(&mut state);
    }

    inv_shift_rows(&mut state);
    inv_sub_bytes(&mut state);
    add_round_key(&mut state, keys, 0);

    store_state(&state)
}

fn load_state(block: &[u8; BLOCK_SIZE]) -> State {
    let mut state = [[0u8; 4]; 4];
    for (i, byte) in block.iter().enumerate() {
        state[i / 4][i % 4] = *byte;
    }
    state
}

fn store_state(state: &State) -> [u8; BLOCK_SIZE] {
    let mut block = [0u8; BLOCK_SIZE];
    for (i, byte) in block.iter_mut().enumerate() {
        *byte = state[i / 4][i % 4];
    }
    block
}

fn sub_word(word: &mut [u8; 4]) {
    for byte in word.iter_mut() {
        *byte = SBOX[*byte as usize];
    }
}

fn add_round_key(state: &mut State, keys: &RoundKeys, round: usize) {
    let round_key = keys.round_key(round);
    for (col, column) in state.iter_mut().enumerate() {
        for (row, byte) in column.iter_mut().enumerate() {
            *byte ^= round_key[col * 4 + row];
        }
    }
}

fn sub_bytes(state: &mut State) {
    for byte in state.iter_mut().flatten() {
        *byte = SBOX[*byte as usize];
    }
}

fn inv_sub_bytes(state: &mut State) {
    for byte in state.iter_mut().flatten() {
        *byte = INV_SBOX[*byte as usize];
    }
}

/// Row `r` is rotated left by `r` columns; row 0 is untouched.
fn shift_rows(state: &mut State) {
    let old = *state;
    for col in 0..4 {
        for row in 1..4 {
            state[col][row] = old[(col + row) % 4][row];
        }
    }
}

/// Row `r` is rotated right by `r` columns.
fn inv_shift_rows(state: &mut State) {
    let old = *state;
    for col in 0..4 {
        for row in 1..4 {
            state[(col + row) % 4][row] = old[col][row];
        }
    }
}

/// Multiplication by `x` in GF(2^8) modulo x^8 + x^4 + x^3 + x + 1.
fn xtime(x: u8) -> u8 {
    (x << 1) ^ (((x >> 7) & 1) * 0x1b)
}

/// General multiplication in GF(2^8).
fn gf_mul(mut a: u8, mut b: u8) -> u8 {
    let mut product = 0u8;
    while b != 0 {
        if b & 1 != 0 {
            product ^= a;
        }
        a = xtime(a);
        b >>= 1;
    }
    product
}

fn mix_columns(state: &mut State) {
    for column in state.iter_mut() {
        let [a, b, c, d] = *column;
        let all = a ^ b ^ c ^ d;
        column[0] ^= all ^ xtime(a ^ b);
        column[1] ^= all ^ xtime(b ^ c);
        column[2] ^= all ^ xtime(c ^ d);
        column[3] ^= all ^ xtime(d ^ a);
    }
}

fn inv_mix_columns(state: &mut State) {
    for column in state.iter_mut() {
        let [a, b, c, d] = *column;
        column[0] = gf_mul(a, 0x0e) ^ gf_mul(b, 0x0b) ^ gf_mul(c, 0x0d) ^ gf_mul(d, 0x09);
        column[1] = gf_mul(a, 0x09) ^ gf_mul(b, 0x0e) ^ gf_mul(c, 0x0b) ^ gf_mul(d, 0x0d);
        column[2] = gf_mul(a, 0x0d) ^ gf_mul(b, 0x09) ^ gf_mul(c, 0x0e) ^ gf_mul(d, 0x0b);
        column[3] = gf_mul(a, 0x0b) ^ gf_mul(b, 0x0d) ^ gf_mul(c, 0x09) ^ gf_mul(d, 0x0e);
    }
}
