//! Static single-byte opcodes.
//!
//! Push opcodes (`0x01..=0x4e`) are handled by [`PushData`](super::PushData);
//! bytes with no entry here decode as [`OpCode::Unmapped`](super::OpCode).

macro_rules! static_codes {
    ($($variant:ident = $code:literal => $name:literal),+ $(,)?) => {
        /// A named opcode that carries no data.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum StaticCode {
            $($variant),+
        }

        impl StaticCode {
            /// Every static opcode, in code order.
            pub const ALL: &'static [StaticCode] = &[$(StaticCode::$variant),+];

            pub fn code(self) -> u8 {
                match self {
                    $(StaticCode::$variant => $code),+
                }
            }

            pub fn name(self) -> &'static str {
                match self {
                    $(StaticCode::$variant => $name),+
                }
            }

            pub fn from_code(code: u8) -> Option<Self> {
                match code {
                    $($code => Some(StaticCode::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

static_codes! {
    // constants
    Op0 = 0x00 => "OP_0",
    Op1Negate = 0x4f => "OP_1NEGATE",
    OpReserved = 0x50 => "OP_RESERVED",
    Op1 = 0x51 => "OP_1",
    Op2 = 0x52 => "OP_2",
    Op3 = 0x53 => "OP_3",
    Op4 = 0x54 => "OP_4",
    Op5 = 0x55 => "OP_5",
    Op6 = 0x56 => "OP_6",
    Op7 = 0x57 => "OP_7",
    Op8 = 0x58 => "OP_8",
    Op9 = 0x59 => "OP_9",
    Op10 = 0x5a => "OP_10",
    Op11 = 0x5b => "OP_11",
    Op12 = 0x5c => "OP_12",
    Op13 = 0x5d => "OP_13",
    Op14 = 0x5e => "OP_14",
    Op15 = 0x5f => "OP_15",
    Op16 = 0x60 => "OP_16",

    // control
    OpNop = 0x61 => "OP_NOP",
    OpVer = 0x62 => "OP_VER",
    OpIf = 0x63 => "OP_IF",
    OpNotIf = 0x64 => "OP_NOTIF",
    OpVerIf = 0x65 => "OP_VERIF",
    OpVerNotIf = 0x66 => "OP_VERNOTIF",
    OpElse = 0x67 => "OP_ELSE",
    OpEndIf = 0x68 => "OP_ENDIF",
    OpVerify = 0x69 => "OP_VERIFY",
    OpReturn = 0x6a => "OP_RETURN",

    // stack
    OpToAltStack = 0x6b => "OP_TOALTSTACK",
    OpFromAltStack = 0x6c => "OP_FROMALTSTACK",
    Op2Drop = 0x6d => "OP_2DROP",
    Op2Dup = 0x6e => "OP_2DUP",
    Op3Dup = 0x6f => "OP_3DUP",
    Op2Over = 0x70 => "OP_2OVER",
    Op2Rot = 0x71 => "OP_2ROT",
    Op2Swap = 0x72 => "OP_2SWAP",
    OpIfDup = 0x73 => "OP_IFDUP",
    OpDepth = 0x74 => "OP_DEPTH",
    OpDrop = 0x75 => "OP_DROP",
    OpDup = 0x76 => "OP_DUP",
    OpNip = 0x77 => "OP_NIP",
    OpOver = 0x78 => "OP_OVER",
    OpPick = 0x79 => "OP_PICK",
    OpRoll = 0x7a => "OP_ROLL",
    OpRot = 0x7b => "OP_ROT",
    OpSwap = 0x7c => "OP_SWAP",
    OpTuck = 0x7d => "OP_TUCK",

    // splice
    OpCat = 0x7e => "OP_CAT",
    OpSubstr = 0x7f => "OP_SUBSTR",
    OpLeft = 0x80 => "OP_LEFT",
    OpRight = 0x81 => "OP_RIGHT",
    OpSize = 0x82 => "OP_SIZE",

    // bitwise
    OpInvert = 0x83 => "OP_INVERT",
    OpAnd = 0x84 => "OP_AND",
    OpOr = 0x85 => "OP_OR",
    OpXor = 0x86 => "OP_XOR",
    OpEqual = 0x87 => "OP_EQUAL",
    OpEqualVerify = 0x88 => "OP_EQUALVERIFY",
    OpReserved1 = 0x89 => "OP_RESERVED1",
    OpReserved2 = 0x8a => "OP_RESERVED2",

    // arithmetic
    Op1Add = 0x8b => "OP_1ADD",
    Op1Sub = 0x8c => "OP_1SUB",
    Op2Mul = 0x8d => "OP_2MUL",
    Op2Div = 0x8e => "OP_2DIV",
    OpNegate = 0x8f => "OP_NEGATE",
    OpAbs = 0x90 => "OP_ABS",
    OpNot = 0x91 => "OP_NOT",
    Op0NotEqual = 0x92 => "OP_0NOTEQUAL",
    OpAdd = 0x93 => "OP_ADD",
    OpSub = 0x94 => "OP_SUB",
    OpMul = 0x95 => "OP_MUL",
    OpDiv = 0x96 => "OP_DIV",
    OpMod = 0x97 => "OP_MOD",
    OpLShift = 0x98 => "OP_LSHIFT",
    OpRShift = 0x99 => "OP_RSHIFT",
    OpBoolAnd = 0x9a => "OP_BOOLAND",
    OpBoolOr = 0x9b => "OP_BOOLOR",
    OpNumEqual = 0x9c => "OP_NUMEQUAL",
    OpNumEqualVerify = 0x9d => "OP_NUMEQUALVERIFY",
    OpNumNotEqual = 0x9e => "OP_NUMNOTEQUAL",
    OpLessThan = 0x9f => "OP_LESSTHAN",
    OpGreaterThan = 0xa0 => "OP_GREATERTHAN",
    OpLessThanOrEqual = 0xa1 => "OP_LESSTHANOREQUAL",
    OpGreaterThanOrEqual = 0xa2 => "OP_GREATERTHANOREQUAL",
    OpMin = 0xa3 => "OP_MIN",
    OpMax = 0xa4 => "OP_MAX",
    OpWithin = 0xa5 => "OP_WITHIN",

    // crypto
    OpRipemd160 = 0xa6 => "OP_RIPEMD160",
    OpSha1 = 0xa7 => "OP_SHA1",
    OpSha256 = 0xa8 => "OP_SHA256",
    OpHash160 = 0xa9 => "OP_HASH160",
    OpHash256 = 0xaa => "OP_HASH256",
    OpCodeSeparator = 0xab => "OP_CODESEPARATOR",
    OpCheckSig = 0xac => "OP_CHECKSIG",
    OpCheckSigVerify = 0xad => "OP_CHECKSIGVERIFY",
    OpCheckMultiSig = 0xae => "OP_CHECKMULTISIG",
    OpCheckMultiSigVerify = 0xaf => "OP_CHECKMULTISIGVERIFY",

    // locktime and expansion
    OpNop1 = 0xb0 => "OP_NOP1",
    OpCheckLockTimeVerify = 0xb1 => "OP_CHECKLOCKTIMEVERIFY",
    OpCheckSequenceVerify = 0xb2 => "OP_CHECKSEQUENCEVERIFY",
    OpNop4 = 0xb3 => "OP_NOP4",
    OpNop5 = 0xb4 => "OP_NOP5",
    OpNop6 = 0xb5 => "OP_NOP6",
    OpNop7 = 0xb6 => "OP_NOP7",
    OpNop8 = 0xb7 => "OP_NOP8",
    OpNop9 = 0xb8 => "OP_NOP9",
    OpNop10 = 0xb9 => "OP_NOP10",
}

/// Highest single-byte code that pushes data (`OP_PUSHDATA4`).
pub const OP_PUSHDATA4: u8 = 0x4e;
pub const OP_PUSHDATA2: u8 = 0x4d;
pub const OP_PUSHDATA1: u8 = 0x4c;
/// Largest length pushed by the opcode byte itself.
pub const MAX_DIRECT_PUSH: u8 = 0x4b;
