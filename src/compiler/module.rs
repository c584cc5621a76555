use std::{
    collections::{HashMap, HashSet},
    fs,
    rc::Rc,
};

use tracing::info;

use crate::{
    ast::{
        arena::{NodeArena, NodeRef},
        nodes::{FunctionDeclNode, ScopeNode},
    },
    diagnostics::{collector::Collector, issues::CodeReference},
    errors::errors::{Error, ErrorImpl},
    lexer::{
        lexer::tokenize,
        tokens::{TokenSlice, TokenStream},
    },
    parser::{parser::parse_file, symbols::collect_symbols},
    symbols::{namespace::NamespaceTable, registry::FunctionRegistry},
    Position,
};

/// One file handed to [`parse_input`]. When `content` is absent the file is
/// read from `path`.
#[derive(Debug, Clone)]
pub struct SourceInput {
    pub path: String,
    pub content: Option<String>,
}

impl SourceInput {
    pub fn from_path(path: &str) -> Self {
        SourceInput {
            path: path.to_string(),
            content: None,
        }
    }

    pub fn in_memory(path: &str, content: &str) -> Self {
        SourceInput {
            path: path.to_string(),
            content: Some(content.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: Rc<String>,
    pub source: String,
    pub tokens: Rc<TokenStream>,
    /// Set by the second pass.
    pub root: Option<NodeRef<ScopeNode>>,
    /// Signatures registered by the first pass, by index of their `fn` token.
    pub(crate) signatures: HashMap<u32, NodeRef<FunctionDeclNode>>,
    /// `fn` tokens whose signature failed to parse in the first pass.
    pub(crate) rejected_signatures: HashSet<u32>,
}

/// A compilation unit: the files parsed together, sharing one arena, one
/// namespace tree and one function registry.
#[derive(Debug, Clone)]
pub struct Module {
    pub name: Rc<String>,
    pub arena: NodeArena,
    pub namespaces: NamespaceTable,
    pub functions: FunctionRegistry,
    pub root: NodeRef<ScopeNode>,
    pub files: Vec<SourceFile>,
}

impl Module {
    pub fn new(name: &str) -> Self {
        let name = Rc::new(name.to_string());
        let mut arena = NodeArena::new();
        let root = arena.alloc(ScopeNode::new(
            CodeReference {
                module: Rc::clone(&name),
                file: Rc::new(String::from("<module>")),
                slice: TokenSlice::default(),
                line: 0,
                column: 0,
            },
            None,
        ));

        Module {
            name,
            arena,
            namespaces: NamespaceTable::new(),
            functions: FunctionRegistry::new(),
            root,
            files: vec![],
        }
    }

    /// Tokenizes `source` and appends it as a new file. Returns its index.
    pub fn add_file(&mut self, path: &str, source: String) -> Result<usize, Error> {
        let path = Rc::new(path.to_string());
        let tokens = tokenize(&source, Rc::clone(&path))?;

        self.files.push(SourceFile {
            path,
            source,
            tokens: Rc::new(tokens),
            root: None,
            signatures: HashMap::new(),
            rejected_signatures: HashSet::new(),
        });
        Ok(self.files.len() - 1)
    }

    pub fn file(&self, path: &str) -> Option<&SourceFile> {
        self.files.iter().find(|file| file.path.as_str() == path)
    }

    /// Source text of `path`, for rendering excerpts.
    pub fn source_of(&self, path: &str) -> Option<&str> {
        self.file(path).map(|file| file.source.as_str())
    }
}

fn read_input(input: SourceInput) -> Result<(String, String), Error> {
    match input.content {
        Some(content) => Ok((input.path, content)),
        None => match fs::read_to_string(&input.path) {
            Ok(content) => Ok((input.path, content)),
            Err(error) => Err(Error::new(
                ErrorImpl::FileRead {
                    path: input.path.clone(),
                    message: error.to_string(),
                },
                Position::new(0, 0, Rc::new(input.path)),
            )),
        },
    }
}

/// Parses `files` into `module`.
///
/// All files are read and tokenized before any parsing starts; a file that
/// cannot be read or lexed fails the whole call. Then the first pass
/// registers every function signature of every file, and only after that
/// the second pass builds the bodies, so calls resolve regardless of
/// declaration order. Everything else is reported through `collector`.
pub fn parse_input(files: Vec<SourceInput>, module: &mut Module, collector: &mut Collector) -> Result<(), Error> {
    let contents = files
        .into_iter()
        .map(read_input)
        .collect::<Result<Vec<_>, Error>>()?;

    let first = module.files.len();
    for (path, content) in contents {
        module.add_file(&path, content)?;
    }
    let added = first..module.files.len();

    for index in added.clone() {
        collect_symbols(module, collector, index);
    }
    for index in added.clone() {
        parse_file(module, collector, index);
    }

    info!(
        module = %module.name,
        files = added.len(),
        nodes = module.arena.len(),
        functions = module.functions.len(),
        issues = collector.len(),
        "parsed module"
    );
    Ok(())
}
