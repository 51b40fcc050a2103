//! Loading and storing module signatures.

use crate::error::LoadError as Error;
use crate::signature::Signature;
use crate::symbols::Symbols;
use fnv::FnvHashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;
use std::rc::Rc;

/// File extension of signature object files.
pub const OBJECT_EXT: &str = "rvo";

/// Registry of loaded module signatures.
///
/// Repeated loads of the same module path return the same signature
/// object, so symbol identity is stable across the whole session.
pub struct Loader {
    root: PathBuf,
    loaded: FnvHashMap<Vec<String>, Rc<Signature>>,
}

impl Loader {
    /// Create a loader that looks for object files under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            loaded: Default::default(),
        }
    }

    /// Where the object file of a module lives.
    pub fn object_path(&self, path: &[String]) -> PathBuf {
        let mut file = self.root.clone();
        path.iter().for_each(|p| file.push(p));
        file.set_extension(OBJECT_EXT);
        file
    }

    /// Resolve a module, reading its object file when not yet loaded.
    ///
    /// Signatures the module depends on must be loaded first, so that
    /// its terms can resolve their symbols.
    pub fn load(&mut self, path: &[String], syms: &mut Symbols) -> Result<Rc<Signature>, Error> {
        if let Some(sig) = self.loaded.get(path) {
            return Ok(sig.clone());
        }
        let file = self.object_path(path);
        debug!("loading signature from {}", file.display());
        let sig = Signature::read(BufReader::new(File::open(&file)?), syms)?;
        let sig = Rc::new(sig);
        self.loaded.insert(path.to_vec(), sig.clone());
        Ok(sig)
    }

    /// Like `load`, but compile the module from source when there is no
    /// object file.
    pub fn load_or_compile<F>(
        &mut self,
        path: &[String],
        syms: &mut Symbols,
        compile: F,
    ) -> Result<Rc<Signature>, Error>
    where
        F: FnOnce(&[String]) -> Result<Signature, Error>,
    {
        if let Some(sig) = self.loaded.get(path) {
            return Ok(sig.clone());
        }
        let file = self.object_path(path);
        let sig = if file.exists() {
            Signature::read(BufReader::new(File::open(&file)?), syms)?
        } else {
            debug!("compiling module {}", path.join("."));
            let sig = compile(path)?;
            for entry in sig.entries() {
                syms.insert_foreign(entry.sym.clone());
            }
            sig
        };
        let sig = Rc::new(sig);
        self.loaded.insert(path.to_vec(), sig.clone());
        Ok(sig)
    }

    /// Write a signature to its object file.
    pub fn store(&self, sig: &Signature) -> Result<(), Error> {
        let file = self.object_path(sig.path());
        if let Some(dir) = file.parent() {
            std::fs::create_dir_all(dir)?;
        }
        debug!("storing signature to {}", file.display());
        sig.write(BufWriter::new(File::create(&file)?))
    }
}
