// opcodes.rs — curated x86-32 opcode classification tables.
//
// Converted from: examples/original_source/src/chunklets/x86.c's
// X86_OPS_1BYTE_*/X86_OPS_2BYTE_* macro groups, which this port expresses
// as match-based classification functions instead of C macro-generated
// switch cases (an idiomatic-Rust restructuring of the same curated table;
// the opcode-to-class mapping itself is unchanged).

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Opclass {
    /// No operand beyond the opcode byte(s) themselves.
    No,
    /// One 8-bit immediate.
    I8,
    /// One immediate whose width follows the operand-size prefix (16 or 32).
    Iw,
    /// One fixed 16-bit immediate regardless of operand-size prefix.
    I16,
    /// A ModR/M (plus possible SIB/displacement), no immediate.
    Mrm,
    /// A ModR/M followed by an 8-bit immediate.
    MrmI8,
    /// A ModR/M followed by an operand-size-width immediate.
    MrmIw,
    /// Not recognised by this curated table.
    Unknown,
}

/// Classifies a one-byte (or prefixed-by-legacy-prefix) opcode, not
/// including the two-byte 0F escape or the ENTER/F6/F7 special cases
/// (handled directly by the caller).
pub fn classify_one_byte(op: u8) -> Opclass {
    use Opclass::*;
    match op {
        // ADD/OR/ADC/SBB/AND/SUB/XOR/CMP: r/m8,r8 | r/m32,r32 | r8,r/m8 |
        // r32,r/m32 | AL,imm8 | eAX,imm32 (rows at 0x00,0x08,0x10,0x18,0x20,
        // 0x28,0x30,0x38)
        _ if is_arith_group(op) => classify_arith_group(op),

        // INC/DEC r32 (0x40-0x4F)
        0x40..=0x4F => No,
        // PUSH/POP r32 (0x50-0x5F)
        0x50..=0x5F => No,
        // PUSHA/POPA
        0x60 | 0x61 => No,
        // BOUND r32, m32&32 (MRM)
        0x62 => Mrm,
        // ARPL r/m16,r16 (MRM)
        0x63 => Mrm,
        // PUSH imm32/16 (IW)
        0x68 => Iw,
        // IMUL r32,r/m32,imm32 (MRM+IW)
        0x69 => MrmIw,
        // PUSH imm8 (I8)
        0x6A => I8,
        // IMUL r32,r/m32,imm8 (MRM+I8)
        0x6B => MrmI8,
        // INS/OUTS (string ops, no operand)
        0x6C..=0x6F => No,
        // Jcc rel8 (0x70-0x7F)
        0x70..=0x7F => I8,
        // group1 r/m8,imm8 (0x80) and r/m16/32,imm8 (0x82, same class as 0x80)
        0x80 | 0x82 => MrmI8,
        // group1 r/m32,imm32 (0x81)
        0x81 => MrmIw,
        // group1 r/m32,imm8 sign-extended (0x83)
        0x83 => MrmI8,
        // TEST r/m,r (0x84,0x85)
        0x84 | 0x85 => Mrm,
        // XCHG r/m,r (0x86,0x87)
        0x86 | 0x87 => Mrm,
        // MOV r/m,r | r,r/m (0x88-0x8B)
        0x88..=0x8B => Mrm,
        // MOV r/m16,Sreg (0x8C)
        0x8C => Mrm,
        // LEA r32,m (0x8D)
        0x8D => Mrm,
        // MOV Sreg,r/m16 (0x8E)
        0x8E => Mrm,
        // POP r/m32 (0x8F)
        0x8F => Mrm,
        // NOP/XCHG eAX,r32 (0x90-0x97)
        0x90..=0x97 => No,
        // CBW/CWDE, CWD/CDQ
        0x98 | 0x99 => No,
        // CALL FAR ptr16:32 (immediate form, rarely hit, treat unknown)
        0x9A => Unknown,
        // FWAIT, PUSHF, POPF, SAHF, LAHF
        0x9B..=0x9F => No,
        // MOV AL,moffs | eAX,moffs | moffs,AL | moffs,eAX (IW-sized address
        // immediate, modeled as Iw since it carries a full address-width
        // immediate and no ModR/M)
        0xA0..=0xA3 => Iw,
        // MOVS/CMPS string ops
        0xA4..=0xA7 => No,
        // TEST AL,imm8 (I8)
        0xA8 => I8,
        // TEST eAX,imm32 (Iw)
        0xA9 => Iw,
        // STOS/LODS/SCAS string ops
        0xAA..=0xAF => No,
        // MOV r8,imm8 (0xB0-0xB7)
        0xB0..=0xB7 => I8,
        // MOV r32,imm32 (0xB8-0xBF)
        0xB8..=0xBF => Iw,
        // group2 r/m8,imm8 | r/m32,imm8 (shift/rotate, 0xC0/0xC1)
        0xC0 | 0xC1 => MrmI8,
        // RET imm16 (0xC2)
        0xC2 => I16,
        // RET (0xC3)
        0xC3 => No,
        // LES/LDS r32,m (0xC4,0xC5)
        0xC4 | 0xC5 => Mrm,
        // MOV r/m8,imm8 | r/m32,imm32 (0xC6,0xC7)
        0xC6 => MrmI8,
        0xC7 => MrmIw,
        // 0xC8 ENTER handled by caller
        // LEAVE (0xC9)
        0xC9 => No,
        // RETF imm16 (0xCA)
        0xCA => I16,
        // RETF (0xCB)
        0xCB => No,
        // INT3 (0xCC)
        0xCC => No,
        // INT imm8 (0xCD)
        0xCD => I8,
        // INTO, IRET
        0xCE | 0xCF => No,
        // group2 r/m,1 | r/m,CL (shift/rotate, no immediate, 0xD0-0xD3)
        0xD0..=0xD3 => Mrm,
        // AAM/AAD (I8)
        0xD4 | 0xD5 => I8,
        // XLAT
        0xD6 | 0xD7 => No,
        // x87 FPU escapes (0xD8-0xDF): ModR/M only, no separate immediate
        0xD8..=0xDF => Mrm,
        // LOOPNE/LOOPE/LOOP/JCXZ rel8 (0xE0-0xE3)
        0xE0..=0xE3 => I8,
        // IN/OUT AL/eAX,imm8 (0xE4,0xE5)
        0xE4 | 0xE5 => I8,
        0xE6 | 0xE7 => I8,
        // CALL rel32 (0xE8)
        0xE8 => Iw,
        // JMP rel32 (0xE9)
        0xE9 => Iw,
        // JMP FAR ptr16:32 (0xEA) - unsupported fixed form
        0xEA => Unknown,
        // JMP rel8 (0xEB)
        0xEB => I8,
        // IN/OUT AL/eAX,DX (0xEC-0xEF)
        0xEC..=0xEF => No,
        // 0xF0 LOCK, 0xF2/0xF3 REP prefixes handled earlier
        // HLT (0xF4)
        0xF4 => No,
        // CMC (0xF5)
        0xF5 => No,
        // 0xF6/0xF7 handled by caller (CRAZY8/CRAZYW)
        // CLC/STC/CLI/STI/CLD/STD (0xF8-0xFD)
        0xF8..=0xFD => No,
        // group INC/DEC r/m8 (0xFE)
        0xFE => Mrm,
        // group INC/DEC/CALL/CALLF/JMP/JMPF/PUSH r/m32 (0xFF)
        0xFF => Mrm,
        _ => Unknown,
    }
}

fn is_arith_group(op: u8) -> bool {
    let row = op & 0xF8;
    matches!(row, 0x00 | 0x08 | 0x10 | 0x18 | 0x20 | 0x28 | 0x30 | 0x38) && (op & 0x07) <= 5
}

fn classify_arith_group(op: u8) -> Opclass {
    use Opclass::*;
    match op & 0x07 {
        0 | 1 | 2 | 3 => Mrm,
        4 => I8,
        5 => Iw,
        _ => Unknown,
    }
}

/// Classifies a two-byte (0F-escaped) opcode.
pub fn classify_two_byte(op: u8) -> Opclass {
    use Opclass::*;
    match op {
        // SYSCALL/CLTS/SYSRET/... various no-operand system instructions
        0x00 => Mrm, // group 6 (SLDT/STR/LLDT/LTR/VERR/VERW) - MRM
        0x01 => Mrm, // group 7 (SGDT/SIDT/LGDT/LIDT/SMSW/LMSW/INVLPG) - MRM
        0x02 | 0x03 => Mrm, // LAR/LSL
        0x05 => No,  // SYSCALL
        0x06 => No,  // CLTS
        0x07 => No,  // SYSRET
        0x08 => No,  // INVD
        0x09 => No,  // WBINVD
        0x0B => No,  // UD2
        0x0D => Mrm, // PREFETCH
        0x18..=0x1F => Mrm, // HINT_NOP / PREFETCHh
        0x20..=0x23 => Mrm, // MOV r32,CRn / MOV CRn,r32 / DRn variants
        0x28 | 0x29 => Mrm, // MOVAPS
        0x2A..=0x2F => Mrm, // CVT*, COMISS family
        0x31 => No,  // RDTSC
        0x32 => No,  // RDMSR
        0x33 => No,  // RDPMC
        0x34 | 0x35 => No, // SYSENTER/SYSEXIT
        0x40..=0x4F => Mrm, // CMOVcc
        0x6E..=0x7F => Mrm, // MMX/SSE move/pack family (curated subset)
        0x80..=0x8F => Iw,  // Jcc rel32
        0x90..=0x9F => Mrm, // SETcc r/m8
        0xA0 | 0xA1 => No,  // PUSH/POP FS
        0xA2 => No,         // CPUID
        0xA3 => Mrm,        // BT r/m,r
        0xA4 => MrmI8,      // SHLD r/m,r,imm8
        0xA5 => Mrm,        // SHLD r/m,r,CL
        0xA8 | 0xA9 => No,  // PUSH/POP GS
        0xAB => Mrm,        // BTS
        0xAC => MrmI8,      // SHRD r/m,r,imm8
        0xAD => Mrm,        // SHRD r/m,r,CL
        0xAF => Mrm,        // IMUL r,r/m
        0xB0 | 0xB1 => Mrm, // CMPXCHG
        0xB2 => Mrm,        // LSS
        0xB3 => Mrm,        // BTR
        0xB4 | 0xB5 => Mrm, // LFS/LGS
        0xB6..=0xB7 => Mrm, // MOVZX
        0xBA => MrmI8,      // group8 BT/BTS/BTR/BTC r/m,imm8
        0xBB => Mrm,        // BTC
        0xBC | 0xBD => Mrm, // BSF/BSR
        0xBE..=0xBF => Mrm, // MOVSX
        0xC0 | 0xC1 => Mrm, // XADD
        0xC7 => Mrm,        // CMPXCHG8B
        0xC8..=0xCF => No,  // BSWAP r32
        _ => Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arith_group_classification() {
        assert_eq!(classify_one_byte(0x00), Opclass::Mrm); // ADD r/m8,r8
        assert_eq!(classify_one_byte(0x04), Opclass::I8); // ADD AL,imm8
        assert_eq!(classify_one_byte(0x05), Opclass::Iw); // ADD eAX,imm32
        assert_eq!(classify_one_byte(0x38), Opclass::Mrm); // CMP r/m8,r8
        assert_eq!(classify_one_byte(0x3C), Opclass::I8); // CMP AL,imm8
    }
}
