//! x86-32 instruction length decoder.
//!
//! Given a pointer to the start of an instruction, `x86_len` returns the
//! length of that one instruction in bytes, or `None` if the first byte
//! sequence isn't recognised. This must never silently return a wrong
//! length -- callers (`sst-hook`'s inline-hook prologue walker) rely on it
//! byte-exactly to avoid corrupting a patched function.
//!
//! Converted from: examples/original_source/src/chunklets/x86.c (the
//! constant-table variant of the decoder, chosen as the canonical source
//! per DESIGN.md since its opcode classification translates directly to
//! Rust `const` arrays without the C original's goto-label idiom).

mod opcodes;

use opcodes::{classify_one_byte, classify_two_byte, Opclass};

const PFX_ADSZ: u8 = 0x67;
const PFX_OPSZ: u8 = 0x66;
const SEG_PREFIXES: [u8; 6] = [0x2E, 0x36, 0x3E, 0x26, 0x64, 0x65];
const PFX_LOCK: u8 = 0xF0;
const PFX_REPN: u8 = 0xF2;
const PFX_REP: u8 = 0xF3;
const TWO_BYTE_ESCAPE: u8 = 0x0F;
const ENTER: u8 = 0xC8;
const CRAZY8: u8 = 0xF6;
const CRAZYW: u8 = 0xF7;
const THREE_BYTE_1: u8 = 0x38;
const THREE_BYTE_2: u8 = 0x3A;
const THREE_DNOW: u8 = 0x0F; // 0F 0F ... 3DNow!, caught via explicit check below

/// Computes the length in bytes of one x86-32 instruction starting at
/// `insn`. Returns `None` if the byte sequence isn't recognised (mirrors
/// the C original's `-1` sentinel).
pub fn x86_len(insn: &[u8]) -> Option<usize> {
    let mut pos = 0usize;
    let mut pfxlen = 0usize;
    let mut addrlen = 4usize;
    let mut operandlen = 4usize;

    // prefix loop
    loop {
        let b = *insn.get(pos)?;
        if b == PFX_ADSZ {
            addrlen = 2;
        } else if b == PFX_OPSZ {
            operandlen = 2;
        } else if SEG_PREFIXES.contains(&b) || b == PFX_LOCK || b == PFX_REPN || b == PFX_REP {
            // handled below, fallthrough
        } else {
            break;
        }
        pfxlen += 1;
        pos += 1;
        if pfxlen == 14 {
            return None;
        }
    }

    let op = *insn.get(pos)?;

    if op == TWO_BYTE_ESCAPE {
        pos += 1;
        let op2 = *insn.get(pos)?;
        // no supported 3-byte maps
        if op2 == THREE_BYTE_1 || op2 == THREE_BYTE_2 {
            return None;
        }
        if op2 == 0x0F {
            // 3DNow! suffix-immediate form, unsupported
            return None;
        }
        let _ = THREE_DNOW;
        let class = classify_two_byte(op2);
        return match class {
            Opclass::No => Some(pfxlen + 2),
            Opclass::Iw => Some(pfxlen + 2 + operandlen),
            Opclass::Mrm => Some(pfxlen + 2 + mrmsib(&insn[pos + 1..], addrlen)?),
            Opclass::MrmI8 => Some(pfxlen + 2 + 1 + mrmsib(&insn[pos + 1..], addrlen)?),
            _ => None,
        };
    }

    match op {
        ENTER => return Some(pfxlen + 4),
        CRAZY8 | CRAZYW => {
            let modrm = *insn.get(pos + 1)?;
            let sub = (modrm >> 3) & 0x7;
            let imm = if op == CRAZY8 {
                if sub < 2 { 1 } else { 0 }
            } else if sub < 2 {
                operandlen
            } else {
                0
            };
            return Some(pfxlen + 1 + imm + mrmsib(&insn[pos + 1..], addrlen)?);
        }
        _ => {}
    }

    let class = classify_one_byte(op);
    match class {
        Opclass::No => Some(pfxlen + 1),
        Opclass::I8 => Some(pfxlen + 1 + 1),
        Opclass::Iw => Some(pfxlen + 1 + operandlen),
        Opclass::I16 => Some(pfxlen + 3),
        Opclass::Mrm => Some(pfxlen + 1 + mrmsib(&insn[pos + 1..], addrlen)?),
        Opclass::MrmI8 => Some(pfxlen + 1 + 1 + mrmsib(&insn[pos + 1..], addrlen)?),
        Opclass::MrmIw => Some(pfxlen + 1 + operandlen + mrmsib(&insn[pos + 1..], addrlen)?),
        Opclass::Unknown => None,
    }
}

/// Computes the size, in bytes, of a ModR/M byte plus any SIB/displacement
/// bytes that follow it. `p` must point at the ModR/M byte itself; the
/// returned length includes that byte.
fn mrmsib(p: &[u8], addrlen: usize) -> Option<usize> {
    let b = *p.first()?;
    if addrlen == 4 || (b & 0xC0) != 0 {
        let sib = addrlen == 4 && b < 0xC0 && (b & 7) == 4;
        match b & 0xC0 {
            0x40 => return Some(2 + sib as usize), // disp8
            0x00 => {
                if (b & 7) != 5 {
                    if sib {
                        let sib_byte = *p.get(1)?;
                        if (sib_byte & 7) == 5 {
                            return Some(if (b & 0x40) != 0 { 3 } else { 6 });
                        }
                    }
                    return Some(1 + sib as usize);
                }
                // b&7==5, mod==00: disp32-only addressing, falls through to
                // the 0x80 case below (same as the C original's switch
                // fallthrough).
                return Some(1 + addrlen + sib as usize);
            }
            0x80 => return Some(1 + addrlen + sib as usize),
            _ => {}
        }
    }
    if addrlen == 2 && (b & 0xC7) == 0x06 {
        return Some(3);
    }
    Some(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fstp_dword_ptr_esp_is_three_bytes() {
        // spec.md scenario 6: D9 1C 24 (fstp dword ptr [esp])
        assert_eq!(x86_len(&[0xD9, 0x1C, 0x24]), Some(3));
    }

    #[test]
    fn single_byte_no_operand() {
        // RET
        assert_eq!(x86_len(&[0xC3]), Some(1));
        // NOP
        assert_eq!(x86_len(&[0x90]), Some(1));
        // PUSH EAX
        assert_eq!(x86_len(&[0x50]), Some(1));
    }

    #[test]
    fn imm8_forms() {
        // PUSH imm8
        assert_eq!(x86_len(&[0x6A, 0x05]), Some(2));
        // Jcc rel8 (JE)
        assert_eq!(x86_len(&[0x74, 0x10]), Some(2));
    }

    #[test]
    fn imm32_forms() {
        // MOV EAX, imm32
        assert_eq!(x86_len(&[0xB8, 1, 2, 3, 4]), Some(5));
        // CALL rel32
        assert_eq!(x86_len(&[0xE8, 0, 0, 0, 0]), Some(5));
        // JMP rel32
        assert_eq!(x86_len(&[0xE9, 0, 0, 0, 0]), Some(5));
    }

    #[test]
    fn operand_size_prefix_shrinks_immediate() {
        // 66 B8 imm16 -> MOV AX, imm16 (5 bytes with opsize prefix? actually
        // B8 is NO-operand-prefix-affected? for this decoder MOV r32,imm32
        // is classed IW so operandlen applies)
        assert_eq!(x86_len(&[0x66, 0xB8, 1, 2]), Some(4));
    }

    #[test]
    fn modrm_only_mov_reg_reg() {
        // MOV EAX, ECX  (89 C8 -> mod=11,reg=ecx,rm=eax)
        assert_eq!(x86_len(&[0x89, 0xC8]), Some(2));
    }

    #[test]
    fn modrm_disp8() {
        // MOV EAX, [ECX+0x10]  (8B 41 10)
        assert_eq!(x86_len(&[0x8B, 0x41, 0x10]), Some(3));
    }

    #[test]
    fn modrm_disp32_via_sib_no_base() {
        // MOV EAX, [0x11223344]  (8B 05 44 33 22 11) mod=00 rm=101(disp32)
        assert_eq!(x86_len(&[0x8B, 0x05, 0x44, 0x33, 0x22, 0x11]), Some(6));
    }

    #[test]
    fn modrm_sib_disp32_no_base() {
        // MOV EAX, [EAX*4+0x11223344]  (8B 04 85 44 33 22 11)
        assert_eq!(
            x86_len(&[0x8B, 0x04, 0x85, 0x44, 0x33, 0x22, 0x11]),
            Some(7)
        );
    }

    #[test]
    fn modrm_disp16_only_16bit_addressing() {
        // addrlen=2 (67 prefix), mod=00, rm=110: disp16-only addressing,
        // regardless of the reg field in between (bits 543).
        // MOV AX, [0x1234]  (67 8B 06 34 12)
        assert_eq!(x86_len(&[0x67, 0x8B, 0x06, 0x34, 0x12]), Some(5));
        // Same mod/rm bits with a nonzero reg field (reg=001 -> 0x0E).
        assert_eq!(x86_len(&[0x67, 0x8B, 0x0E, 0x34, 0x12]), Some(5));
        // reg=010 -> 0x16
        assert_eq!(x86_len(&[0x67, 0x8B, 0x16, 0x34, 0x12]), Some(5));
    }

    #[test]
    fn mrm_i8_group1() {
        // ADD dword ptr [EAX], imm8 (83 00 05) - group1 r/m32, imm8
        assert_eq!(x86_len(&[0x83, 0x00, 0x05]), Some(3));
    }

    #[test]
    fn mrm_iw_group1() {
        // ADD dword ptr [EAX], imm32 (81 00 AA BB CC DD)
        assert_eq!(
            x86_len(&[0x81, 0x00, 0xAA, 0xBB, 0xCC, 0xDD]),
            Some(6)
        );
    }

    #[test]
    fn crazy_f7_test_has_immediate() {
        // TEST dword ptr [EAX], imm32 (F7 00 AA BB CC DD) - /0 is TEST
        assert_eq!(
            x86_len(&[0xF7, 0x00, 0xAA, 0xBB, 0xCC, 0xDD]),
            Some(6)
        );
    }

    #[test]
    fn crazy_f7_neg_has_no_immediate() {
        // NEG dword ptr [EAX] (F7 18) - /3 is NEG, no immediate
        assert_eq!(x86_len(&[0xF7, 0x18]), Some(2));
    }

    #[test]
    fn two_byte_jcc_near() {
        // JE rel32 (0F 84 00 00 00 00)
        assert_eq!(x86_len(&[0x0F, 0x84, 0, 0, 0, 0]), Some(6));
    }

    #[test]
    fn two_byte_movzx() {
        // MOVZX EAX, byte ptr [ECX] (0F B6 01)
        assert_eq!(x86_len(&[0x0F, 0xB6, 0x01]), Some(3));
    }

    #[test]
    fn lock_prefix_counts_toward_length() {
        // LOCK INC dword ptr [EAX] (F0 FF 00)
        assert_eq!(x86_len(&[0xF0, 0xFF, 0x00]), Some(3));
    }

    #[test]
    fn too_many_prefixes_rejected() {
        let mut insn = vec![0xF0u8; 14];
        insn.push(0x90);
        assert_eq!(x86_len(&insn), None);
    }

    #[test]
    fn unsupported_three_byte_escape_rejected() {
        assert_eq!(x86_len(&[0x0F, 0x38, 0x00]), None);
    }

    #[test]
    fn enter_is_four_bytes() {
        // ENTER imm16, imm8
        assert_eq!(x86_len(&[0xC8, 0x10, 0x00, 0x00]), Some(4));
    }

    #[test]
    fn truncated_input_is_none() {
        assert_eq!(x86_len(&[]), None);
        assert_eq!(x86_len(&[0x8B]), None);
    }
}
