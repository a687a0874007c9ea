use std::rc::Rc;

use indexmap::IndexMap;
use pavo_ast as ast;
use pavo_ir as ir;

use crate::error::{Diagnostic, Error};
use crate::exec::{self, FuncArgsSpec, FuncToExecute};
use crate::introspect::{self, VisFuncsInfo};
use crate::objects::{
    platform_module, ModuleHandler, ModuleObject, Object, ObjectRef, PLATFORM_MODULE_NAME,
};
use crate::parse::SourceParser;
use crate::semantic::{Evaluator, OperatorContext, ScopeRef, SuiteKind, VarTable};

/// Compilation configuration.
#[derive(Debug, Clone, Default)]
pub struct CompileParams {
    /// User-importable modules: module name to source text.
    pub module_map: IndexMap<String, String>,
    /// Compile-time clock, nanoseconds since the epoch. `pavo.now()`
    /// resolves to this value.
    pub time_now: i64,
}

/// One compile: owns the IR graph, the module registry and the root
/// scope. Nothing is shared across compiles.
#[derive(Debug)]
pub struct Compiler {
    graph: ir::Graph,
    modules: ModuleHandler,
    scope: ScopeRef,
    time_now: i64,
}

impl Compiler {
    /// Seeds the root scope and registers the platform module and every
    /// user module before any evaluation runs.
    pub fn new(params: CompileParams, parser: &dyn SourceParser) -> Result<Compiler, Error> {
        let mut compiler = Compiler {
            graph: ir::Graph::new(),
            modules: ModuleHandler::default(),
            scope: VarTable::create(),
            time_now: params.time_now,
        };
        compiler
            .init(params, parser)
            .map_err(Diagnostic::into_error)?;
        Ok(compiler)
    }

    fn init(&mut self, params: CompileParams, parser: &dyn SourceParser) -> crate::Result<()> {
        self.evaluator().init_globals()?;

        self.modules.insert(PLATFORM_MODULE_NAME, platform_module());
        for (name, source) in params.module_map {
            let module = self.load_module(&name, &source, parser)?;
            self.modules.insert(name, module);
        }
        Ok(())
    }

    /// Materializes one user module by evaluating its source text in a
    /// fresh child scope.
    fn load_module(
        &mut self,
        name: &str,
        source: &str,
        parser: &dyn SourceParser,
    ) -> crate::Result<ObjectRef> {
        log::debug!("loading module '{name}'");
        let tree = parser.parse_module(source)?;
        let scope = VarTable::create_child(&self.scope);
        let mut evaluator = Evaluator::new(
            &mut self.graph,
            &mut self.modules,
            scope.clone(),
            self.time_now,
        );
        evaluator.eval_suite(&tree.body, SuiteKind::Module)?;
        Ok(Rc::new(Object::Module(ModuleObject::user(name, scope))))
    }

    fn evaluator(&mut self) -> Evaluator<'_> {
        Evaluator::new(
            &mut self.graph,
            &mut self.modules,
            self.scope.clone(),
            self.time_now,
        )
    }

    /// Evaluates a top-level module syntax tree.
    pub fn eval_module(&mut self, module: &ast::Module) -> Result<(), Error> {
        self.evaluator()
            .eval_suite(&module.body, SuiteKind::Module)
            .map(drop)
            .map_err(Diagnostic::into_error)
    }

    /// Evaluates a parsed single-statement module and returns the value
    /// of its expression. With `bind_platform`, the platform module is
    /// pre-bound in the child scope without touching top-level state.
    pub fn eval_single_expression(
        &mut self,
        module: &ast::Module,
        bind_platform: bool,
    ) -> Result<ObjectRef, Error> {
        let scope = VarTable::create_child(&self.scope);
        if bind_platform {
            let platform = self
                .modules
                .get(PLATFORM_MODULE_NAME)
                .cloned()
                .expect("platform module is registered in Compiler::new");
            scope.borrow_mut().add(PLATFORM_MODULE_NAME, platform);
        }

        let result = (|| {
            let [stmt] = module.body.stmts.as_slice() else {
                return Err(Diagnostic::unsupported(
                    "single-expression evaluation requires exactly one statement",
                ));
            };
            let ast::StmtKind::Expr(expr) = &stmt.kind else {
                return Err(Diagnostic::unsupported(format!(
                    "expected an expression statement, got a different statement kind at {}",
                    stmt.span
                )));
            };
            let mut evaluator = Evaluator::new(
                &mut self.graph,
                &mut self.modules,
                scope.clone(),
                self.time_now,
            );
            evaluator.eval_expr(expr, &OperatorContext::default())
        })();
        result.map_err(Diagnostic::into_error)
    }

    /// Runs the exec descriptors against the evaluated top-level scope.
    pub fn exec_funcs(&mut self, funcs: &[FuncToExecute]) -> Result<(), Error> {
        self.evaluator()
            .exec_funcs(funcs)
            .map_err(Diagnostic::into_error)
    }

    /// Declared parameters and annotations of the `main` entrypoint.
    pub fn main_func_args_spec(&self) -> Result<FuncArgsSpec, Error> {
        exec::main_func_args_spec(&self.scope).map_err(Diagnostic::into_error)
    }

    /// Metadata of every visualization function in the top-level scope.
    pub fn vis_funcs_info(&self) -> VisFuncsInfo {
        introspect::vis_funcs_info(&self.scope)
    }

    /// Looks a name up in the top-level scope.
    pub fn lookup(&self, name: &str) -> Option<ObjectRef> {
        self.scope.borrow().lookup(name)
    }

    pub fn graph(&self) -> &ir::Graph {
        &self.graph
    }

    /// Hands the IR graph to the caller, ending the compile.
    pub fn into_graph(self) -> ir::Graph {
        self.graph
    }
}

/// Compiles a top-level module and returns the IR graph handle.
pub fn compile(
    module: &ast::Module,
    params: CompileParams,
    parser: &dyn SourceParser,
) -> Result<ir::Graph, Error> {
    let mut compiler = Compiler::new(params, parser)?;
    compiler.eval_module(module)?;
    Ok(compiler.into_graph())
}
