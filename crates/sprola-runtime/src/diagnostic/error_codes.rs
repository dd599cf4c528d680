//! Error code registry with descriptions and help text
//!
//! Codes follow the SPxxxx scheme. Ranges:
//! - SP1xxx: Lexer errors
//! - SP2xxx: Parser and static scope errors
//! - SP3xxx: Runtime errors

// SP1xxx - Lexer
pub const UNEXPECTED_CHARACTER: &str = "SP1001";

// SP2xxx - Parser
pub const SYNTAX_ERROR: &str = "SP2001";
pub const REDECLARED_VARIABLE: &str = "SP2002";
pub const UNDECLARED_VARIABLE: &str = "SP2003";
pub const ASSIGN_TO_UNDECLARED: &str = "SP2004";
pub const INVALID_ASSIGNMENT_TARGET: &str = "SP2005";
pub const DUPLICATE_FUNCTION: &str = "SP2006";
pub const BUILTIN_REDEFINITION: &str = "SP2007";
pub const NESTED_FUNCTION: &str = "SP2008";
pub const RETURN_OUTSIDE_FUNCTION: &str = "SP2009";
pub const LITERAL_OUT_OF_RANGE: &str = "SP2010";
pub const NESTING_TOO_DEEP: &str = "SP2011";

// SP3xxx - Runtime
pub const UNDEFINED_VARIABLE: &str = "SP3001";
pub const UNDEFINED_FUNCTION: &str = "SP3002";
pub const ARITY_MISMATCH: &str = "SP3003";
pub const DIVIDE_BY_ZERO: &str = "SP3004";
pub const INVALID_INPUT: &str = "SP3005";
pub const INTEGER_OVERFLOW: &str = "SP3006";
pub const OUTPUT_FAILURE: &str = "SP3007";
pub const CALL_DEPTH_EXCEEDED: &str = "SP3008";
pub const RUNTIME_REDECLARATION: &str = "SP3009";

/// Error code descriptor with code, description, and optional help text
#[derive(Debug, Clone)]
pub struct ErrorCodeInfo {
    /// The error code string (e.g., "SP2001")
    pub code: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Optional contextual help text
    pub help: Option<&'static str>,
}

/// Get info for an error code, if known
pub fn lookup(code: &str) -> Option<ErrorCodeInfo> {
    ERROR_CODES.iter().find(|e| e.code == code).cloned()
}

/// Get help text for an error code
pub fn help_for(code: &str) -> Option<&'static str> {
    lookup(code).and_then(|e| e.help)
}

/// Get description for an error code
pub fn description_for(code: &str) -> Option<&'static str> {
    lookup(code).map(|e| e.description)
}

/// All known error codes with descriptions and help
pub static ERROR_CODES: &[ErrorCodeInfo] = &[
    ErrorCodeInfo {
        code: UNEXPECTED_CHARACTER,
        description: "Unexpected character",
        help: Some("Remove the character. SPROLA source is ASCII letters, digits and operators."),
    },
    ErrorCodeInfo {
        code: SYNTAX_ERROR,
        description: "Syntax error",
        help: None,
    },
    ErrorCodeInfo {
        code: REDECLARED_VARIABLE,
        description: "Variable redeclared in the same scope",
        help: Some("Use '<-' to assign to the existing variable, or pick a different name."),
    },
    ErrorCodeInfo {
        code: UNDECLARED_VARIABLE,
        description: "Use of undeclared variable",
        help: Some("Declare the variable with 'var name <- value;' before using it."),
    },
    ErrorCodeInfo {
        code: ASSIGN_TO_UNDECLARED,
        description: "Assignment to undeclared variable",
        help: Some("Declare the variable with 'var' first; assignment never declares."),
    },
    ErrorCodeInfo {
        code: INVALID_ASSIGNMENT_TARGET,
        description: "Invalid assignment target",
        help: Some("Only a variable name may appear on the left of '<-'."),
    },
    ErrorCodeInfo {
        code: DUPLICATE_FUNCTION,
        description: "Duplicate function declaration",
        help: Some("Rename one of the functions."),
    },
    ErrorCodeInfo {
        code: BUILTIN_REDEFINITION,
        description: "Function name shadows a builtin",
        help: Some("abs, max, min, print and input are reserved for builtins."),
    },
    ErrorCodeInfo {
        code: NESTED_FUNCTION,
        description: "Function declared inside a block",
        help: Some("Move the function declaration to the top level of the file."),
    },
    ErrorCodeInfo {
        code: RETURN_OUTSIDE_FUNCTION,
        description: "Return outside of a function",
        help: None,
    },
    ErrorCodeInfo {
        code: LITERAL_OUT_OF_RANGE,
        description: "Integer literal out of range",
        help: Some("Integer literals must fit in a signed 64-bit integer."),
    },
    ErrorCodeInfo {
        code: NESTING_TOO_DEEP,
        description: "Expression or block nested too deeply",
        help: Some("Split the expression with intermediate variables, or flatten the blocks."),
    },
    ErrorCodeInfo {
        code: UNDEFINED_VARIABLE,
        description: "Undefined variable",
        help: None,
    },
    ErrorCodeInfo {
        code: UNDEFINED_FUNCTION,
        description: "Undefined function",
        help: Some("Check the spelling, or declare the function at the top level."),
    },
    ErrorCodeInfo {
        code: ARITY_MISMATCH,
        description: "Wrong number of arguments",
        help: None,
    },
    ErrorCodeInfo {
        code: DIVIDE_BY_ZERO,
        description: "Division or modulo by zero",
        help: Some("Check the divisor before dividing."),
    },
    ErrorCodeInfo {
        code: INVALID_INPUT,
        description: "Invalid or missing integer input",
        help: Some("Input must be whitespace-separated integers."),
    },
    ErrorCodeInfo {
        code: INTEGER_OVERFLOW,
        description: "Integer overflow",
        help: None,
    },
    ErrorCodeInfo {
        code: OUTPUT_FAILURE,
        description: "Failed to write program output",
        help: None,
    },
    ErrorCodeInfo {
        code: CALL_DEPTH_EXCEEDED,
        description: "Maximum call depth exceeded",
        help: Some("Check for unbounded recursion."),
    },
    ErrorCodeInfo {
        code: RUNTIME_REDECLARATION,
        description: "Variable redeclared at runtime",
        help: None,
    },
];
