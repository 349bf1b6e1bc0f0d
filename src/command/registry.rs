use super::types::{ArgKind, ArgSpec, CommandSpec};

const NO_ARGS: [ArgSpec; 0] = [];
const ARGS_OPEN: [ArgSpec; 1] = [ArgSpec {
    name: "path",
    kind: ArgKind::Path,
    required: true,
}];
const ARGS_POINT: [ArgSpec; 2] = [
    ArgSpec {
        name: "x",
        kind: ArgKind::F64,
        required: true,
    },
    ArgSpec {
        name: "y",
        kind: ArgKind::F64,
        required: true,
    },
];
const ARGS_DISTANCE: [ArgSpec; 1] = [ArgSpec {
    name: "ft",
    kind: ArgKind::Text,
    required: true,
}];
const ARGS_SCALE: [ArgSpec; 1] = [ArgSpec {
    name: "ft-per-inch",
    kind: ArgKind::Text,
    required: true,
}];
const ARGS_SAVE: [ArgSpec; 1] = [ArgSpec {
    name: "path",
    kind: ArgKind::Path,
    required: false,
}];
const ARGS_ZOOM: [ArgSpec; 1] = [ArgSpec {
    name: "factor",
    kind: ArgKind::F64,
    required: true,
}];

const COMMAND_SPECS: [CommandSpec; 10] = [
    CommandSpec {
        id: "open",
        title: "Open Image",
        args: &ARGS_OPEN,
    },
    CommandSpec {
        id: "start",
        title: "Set Start Point",
        args: &ARGS_POINT,
    },
    CommandSpec {
        id: "end",
        title: "Set End Point",
        args: &ARGS_POINT,
    },
    CommandSpec {
        id: "distance",
        title: "Set Physical Distance",
        args: &ARGS_DISTANCE,
    },
    CommandSpec {
        id: "scale",
        title: "Set Desired Scale",
        args: &ARGS_SCALE,
    },
    CommandSpec {
        id: "export",
        title: "Export PDF",
        args: &NO_ARGS,
    },
    CommandSpec {
        id: "save",
        title: "Save PDF",
        args: &ARGS_SAVE,
    },
    CommandSpec {
        id: "preview",
        title: "Toggle PDF Preview",
        args: &NO_ARGS,
    },
    CommandSpec {
        id: "zoom",
        title: "Set Display Zoom",
        args: &ARGS_ZOOM,
    },
    CommandSpec {
        id: "quit",
        title: "Quit",
        args: &NO_ARGS,
    },
];

pub fn command_registry() -> &'static [CommandSpec] {
    &COMMAND_SPECS
}

pub fn find_command_spec(id: &str) -> Option<&'static CommandSpec> {
    COMMAND_SPECS.iter().find(|spec| spec.id == id)
}
