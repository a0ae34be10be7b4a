//! DNA sequence utilities.
//!
//! Reverse complementing is applied to the second index read before it is compared with the
//! first: the sequencer reads index 2 from the opposite strand.

/// Complements a single upper-case DNA base.
///
/// Returns the Watson-Crick complement: A<->T, C<->G. Any other symbol (`N`, lower-case bases,
/// IUPAC codes, punctuation) is returned unchanged.
#[inline]
#[must_use]
pub const fn complement_base(base: u8) -> u8 {
    match base {
        b'A' => b'T',
        b'T' => b'A',
        b'C' => b'G',
        b'G' => b'C',
        _ => base,
    }
}

/// Reverse complements a DNA string.
///
/// The sequence is reversed first and each upper-case base is then substituted with its
/// complement. Lower-case bases are only reversed.
///
/// # Examples
///
/// ```
/// use fqdemux_dna::reverse_complement_str;
///
/// assert_eq!(reverse_complement_str("GGGG"), "CCCC");
/// assert_eq!(reverse_complement_str("AcGt"), "tCcT");
/// ```
#[must_use]
pub fn reverse_complement_str(seq: &str) -> String {
    seq.bytes().rev().map(|base| char::from(complement_base(base))).collect()
}

/// Returns true if the sequence is non-empty and made only of upper-case `A`, `C`, `G` and `T`.
#[must_use]
pub fn is_acgt(seq: &str) -> bool {
    !seq.is_empty() && seq.bytes().all(|b| matches!(b, b'A' | b'C' | b'G' | b'T'))
}
