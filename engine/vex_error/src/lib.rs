//! Typed error taxonomy for the vex engine.
//!
//! Every failure the interpreter, resolver, or pattern engine can raise is a
//! variant of [`VimError`]. Callers match on the variant, not on message
//! strings; the `Display` impl renders the user-visible `E###: message` form
//! that Vim itself prints, so the surface layer can show errors verbatim.
//!
//! The set is closed on purpose: exhaustive matches in consumers are checked
//! by the compiler, and adding a variant is a deliberate API change.

use thiserror::Error;

/// Result alias used throughout the engine.
pub type VimResult<T> = Result<T, VimError>;

/// A Vim-compatible error, carrying the same `E###` numbers Vim assigns.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum VimError {
    // Parsing
    #[error("E15: Invalid expression: {0}")]
    InvalidExpression(String),
    #[error("E114: Missing quote: {0}")]
    MissingQuote(String),
    #[error("E488: Trailing characters: {0}")]
    TrailingCharacters(String),
    #[error("E973: Blob literal should have an even number of hex characters")]
    BlobLiteralShouldHaveAnEvenNumberOfHexCharacters,

    // Type coercion
    #[error("E805: Using a Float as a Number")]
    UsingAFloatAsANumber,
    #[error("E745: Using a List as a Number")]
    UsingAListAsANumber,
    #[error("E728: Using a Dictionary as a Number")]
    UsingADictionaryAsANumber,
    #[error("E703: Using a Funcref as a Number")]
    UsingAFuncrefAsANumber,
    #[error("E974: Using a Blob as a Number")]
    UsingABlobAsANumber,
    #[error("E808: Number or Float required")]
    NumberOrFloatRequired,
    #[error("E730: Using a List as a String")]
    UsingListAsAString,
    #[error("E731: Using a Dictionary as a String")]
    UsingDictionaryAsAString,
    #[error("E729: Using a Funcref as a String")]
    UsingFuncrefAsAString,
    #[error("E806: Using a Float as a String")]
    UsingFloatAsAString,
    #[error("E701: Invalid type for len()")]
    InvalidTypeForLen,
    #[error("E804: Cannot use '%' with Float")]
    CannotUseModuloWithFloat,

    // Structural
    #[error("E684: List index out of range: {0}")]
    ListIndexOutOfRange(i64),
    #[error("E716: Key not present in Dictionary: \"{0}\"")]
    KeyNotPresentInDictionary(String),
    #[error("E721: Duplicate key in Dictionary: \"{0}\"")]
    DuplicateKeyInDictionary(String),
    #[error("E714: List required")]
    ListRequired,
    #[error("E715: Dictionary required")]
    DictionaryRequired,
    #[error("E897: List or Blob required")]
    ListOrBlobRequired,
    #[error("E686: Argument of {0}() must be a List")]
    ArgumentMustBeAList(String),
    #[error("E712: Argument of {0}() must be a List or Dictionary")]
    ArgumentMustBeAListOrDictionary(String),
    #[error("E695: Cannot index a Funcref")]
    CannotIndexAFuncref,
    #[error("E719: Cannot slice a Dictionary")]
    CannotSliceADictionary,
    #[error("E900: maxdepth must be non-negative number")]
    MaxDepthMustBeANonNegativeNumber,

    // Comparison
    #[error("E691: Can only compare List with List")]
    CanOnlyCompareListWithList,
    #[error("E735: Can only compare Dictionary with Dictionary")]
    CanOnlyCompareDictionaryWithDictionary,
    #[error("E977: Can only compare Blob with Blob")]
    CanOnlyCompareBlobWithBlob,
    #[error("E692: Invalid operation for List")]
    InvalidOperationForList,
    #[error("E736: Invalid operation for Dictionary")]
    InvalidOperationForDictionary,
    #[error("E694: Invalid operation for Funcrefs")]
    InvalidOperationForFuncrefs,
    #[error("E978: Invalid operation for Blob")]
    InvalidOperationForBlob,

    // Arity and arguments
    #[error("E119: Not enough arguments for function: {0}")]
    NotEnoughArgs(String),
    #[error("E118: Too many arguments for function: {0}")]
    TooManyArgs(String),
    #[error("E474: Invalid argument")]
    InvalidArgument474,
    #[error("E475: Invalid argument: {0}")]
    InvalidArgument475(String),
    #[error("E923: Second argument of function() must be a list or a dict")]
    SecondArgumentOfFunction,
    #[error("E922: expected a dict")]
    ExpectedADict,
    #[error("E117: Unknown function: {0}")]
    UnknownFunction(String),

    // Variables
    #[error("E121: Undefined variable: {0}")]
    UndefinedVariable(String),
    #[error("E995: Cannot modify existing variable")]
    CannotModifyExistingVariable,
    #[error("E741: Value is locked: {0}")]
    ValueIsLocked(String),
    #[error("E704: Funcref variable name must start with a capital: {0}")]
    FuncrefVariableNameMustStartWithACapital(String),

    // Ranges and addresses
    #[error("E20: Mark not set")]
    MarkNotSet,
    #[error("E486: Pattern not found: {0}")]
    PatternNotFound(String),
    #[error("E35: No previous regular expression")]
    NoPreviousRegularExpression,
    #[error("E33: No previous substitute regular expression")]
    NoPreviousSubstituteRegularExpression,
    #[error("E16: Invalid range")]
    InvalidRange,
    #[error("E726: Stride is zero")]
    StrideIsZero,
    #[error("E727: Start past end")]
    StartPastEnd,
}

impl VimError {
    /// The numeric `E###` code, for hosts that key help or highlighting off it.
    pub fn code(&self) -> u16 {
        use VimError::*;
        match self {
            InvalidExpression(_) => 15,
            MissingQuote(_) => 114,
            TrailingCharacters(_) => 488,
            BlobLiteralShouldHaveAnEvenNumberOfHexCharacters => 973,
            UsingAFloatAsANumber => 805,
            UsingAListAsANumber => 745,
            UsingADictionaryAsANumber => 728,
            UsingAFuncrefAsANumber => 703,
            UsingABlobAsANumber => 974,
            NumberOrFloatRequired => 808,
            UsingListAsAString => 730,
            UsingDictionaryAsAString => 731,
            UsingFuncrefAsAString => 729,
            UsingFloatAsAString => 806,
            InvalidTypeForLen => 701,
            CannotUseModuloWithFloat => 804,
            ListIndexOutOfRange(_) => 684,
            KeyNotPresentInDictionary(_) => 716,
            DuplicateKeyInDictionary(_) => 721,
            ListRequired => 714,
            DictionaryRequired => 715,
            ListOrBlobRequired => 897,
            ArgumentMustBeAList(_) => 686,
            ArgumentMustBeAListOrDictionary(_) => 712,
            CannotIndexAFuncref => 695,
            CannotSliceADictionary => 719,
            MaxDepthMustBeANonNegativeNumber => 900,
            CanOnlyCompareListWithList => 691,
            CanOnlyCompareDictionaryWithDictionary => 735,
            CanOnlyCompareBlobWithBlob => 977,
            InvalidOperationForList => 692,
            InvalidOperationForDictionary => 736,
            InvalidOperationForFuncrefs => 694,
            InvalidOperationForBlob => 978,
            NotEnoughArgs(_) => 119,
            TooManyArgs(_) => 118,
            InvalidArgument474 => 474,
            InvalidArgument475(_) => 475,
            SecondArgumentOfFunction => 923,
            ExpectedADict => 922,
            UnknownFunction(_) => 117,
            UndefinedVariable(_) => 121,
            CannotModifyExistingVariable => 995,
            ValueIsLocked(_) => 741,
            FuncrefVariableNameMustStartWithACapital(_) => 704,
            MarkNotSet => 20,
            PatternNotFound(_) => 486,
            NoPreviousRegularExpression => 35,
            NoPreviousSubstituteRegularExpression => 33,
            InvalidRange => 16,
            StrideIsZero => 726,
            StartPastEnd => 727,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn display_matches_vim_format() {
        assert_eq!(
            VimError::UndefinedVariable("g:foo".into()).to_string(),
            "E121: Undefined variable: g:foo"
        );
        assert_eq!(VimError::MarkNotSet.to_string(), "E20: Mark not set");
        assert_eq!(
            VimError::ListIndexOutOfRange(7).to_string(),
            "E684: List index out of range: 7"
        );
    }

    #[test]
    fn code_agrees_with_display_prefix() {
        let samples = [
            VimError::UsingAFloatAsANumber,
            VimError::StrideIsZero,
            VimError::PatternNotFound("x".into()),
            VimError::DuplicateKeyInDictionary("k".into()),
        ];
        for err in samples {
            let rendered = err.to_string();
            let prefix = format!("E{}:", err.code());
            assert!(rendered.starts_with(&prefix), "{rendered} vs {prefix}");
        }
    }
}
