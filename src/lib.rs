//! Browser front end for the maze generator.
//!
//! The core pipeline (generate, solve, rasterize) is plain Rust in the
//! sibling modules and never touches the DOM. This module wires it to the
//! page: it reads the form inputs, runs the pipeline on button clicks, and
//! displays the resulting RGBA buffer as a texture on a full-canvas quad.

pub mod generate;
pub mod maze;
pub mod render;
pub mod solve;

use std::cell::RefCell;
use std::rc::Rc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Event, HtmlButtonElement, HtmlCanvasElement, HtmlElement, HtmlInputElement,
    WebGlBuffer, WebGlProgram, WebGlRenderingContext as Gl, WebGlShader, WebGlTexture,
    WebGlUniformLocation, Window,
};

use crate::generate::{generate, resolve_seed};
use crate::maze::{Maze, MazeError};
use crate::render::Rasterizer;
use crate::solve::solve;

const VERTEX_SHADER_SOURCE: &str = r#"
attribute vec2 a_position;
attribute vec2 a_texCoord;
varying vec2 v_texCoord;
void main() {
  gl_Position = vec4(a_position, 0.0, 1.0);
  v_texCoord = a_texCoord;
}
"#;

const FRAGMENT_SHADER_SOURCE: &str = r#"
precision mediump float;
varying vec2 v_texCoord;
uniform sampler2D u_texture;
void main() {
  gl_FragColor = texture2D(u_texture, v_texCoord);
}
"#;

/// The five request inputs plus the label toggle, as read from the form.
struct MazeRequest {
    height: usize,
    width: usize,
    seed: u64,
    opposite_corners: bool,
    show_solution: bool,
    label: bool,
}

/// Headless pipeline: generate, optionally solve, rasterize into
/// `rasterizer`. Returns the seed actually used (time-derived when `seed`
/// is zero) so callers can echo it. A rejected request leaves the buffer
/// untouched.
pub fn generate_maze_image(
    rasterizer: &mut Rasterizer,
    height: usize,
    width: usize,
    seed: u64,
    opposite_corners: bool,
    show_solution: bool,
) -> Result<u64, MazeError> {
    let seed = resolve_seed(seed);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut maze = Maze::new(height, width, &mut rng, opposite_corners)?;
    generate(&mut maze, &mut rng);

    rasterizer.render(&maze);
    if show_solution {
        rasterizer.render_path(&solve(&maze));
    }

    Ok(seed)
}

struct App {
    gl: Gl,
    program: WebGlProgram,
    position_buffer: WebGlBuffer,
    tex_coord_buffer: WebGlBuffer,
    texture: WebGlTexture,
    a_position: u32,
    a_tex_coord: u32,
    u_texture: WebGlUniformLocation,
    canvas: HtmlCanvasElement,
    status: HtmlElement,
    label: HtmlElement,
    document: Document,
    rasterizer: Rasterizer,
}

fn window() -> Window {
    web_sys::window().expect("missing window")
}

fn now_ms() -> f64 {
    window().performance().map(|p| p.now()).unwrap_or(0.0)
}

fn trace(stage: &str, started: f64) {
    web_sys::console::log_1(&trace_line(stage, now_ms() - started).into());
}

fn trace_line(stage: &str, elapsed_ms: f64) -> String {
    format!("{stage}: {elapsed_ms:.1}ms")
}

fn set_status(status: &HtmlElement, message: &str) {
    status.set_text_content(Some(message));
}

fn js_value_to_string(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

fn input_element(document: &Document, id: &str) -> Result<HtmlInputElement, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("Missing input: {}", id)))?
        .dyn_into::<HtmlInputElement>()
        .map_err(|_| JsValue::from_str(&format!("Not an input: {}", id)))
}

fn dimension_value(document: &Document, id: &str) -> Result<usize, JsValue> {
    let raw = input_element(document, id)?.value();
    raw.trim()
        .parse()
        .map_err(|_| JsValue::from_str(&format!("{} is not a valid dimension: {:?}", id, raw)))
}

fn seed_value(document: &Document, id: &str) -> Result<u64, JsValue> {
    let raw = input_element(document, id)?.value();
    // Negative seeds are accepted and reinterpreted as unsigned bits.
    raw.trim()
        .parse::<i64>()
        .map(|seed| seed as u64)
        .map_err(|_| JsValue::from_str(&format!("{} is not a valid seed: {:?}", id, raw)))
}

fn checkbox_checked(document: &Document, id: &str) -> Result<bool, JsValue> {
    Ok(input_element(document, id)?.checked())
}

fn read_request(document: &Document) -> Result<MazeRequest, JsValue> {
    Ok(MazeRequest {
        height: dimension_value(document, "mazeHeight")?,
        width: dimension_value(document, "mazeWidth")?,
        seed: seed_value(document, "randomSeed")?,
        opposite_corners: checkbox_checked(document, "oppositeStart")?,
        show_solution: checkbox_checked(document, "showSolution")?,
        label: checkbox_checked(document, "labelMaze")?,
    })
}

fn compile_shader(gl: &Gl, shader_type: u32, source: &str) -> Result<WebGlShader, JsValue> {
    let shader = gl
        .create_shader(shader_type)
        .ok_or_else(|| JsValue::from_str("Unable to create shader"))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    if gl
        .get_shader_parameter(&shader, Gl::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(shader)
    } else {
        let info = gl
            .get_shader_info_log(&shader)
            .unwrap_or_else(|| "Unknown shader error".to_string());
        Err(JsValue::from_str(&info))
    }
}

fn create_program(
    gl: &Gl,
    vertex_source: &str,
    fragment_source: &str,
) -> Result<WebGlProgram, JsValue> {
    let vertex_shader = compile_shader(gl, Gl::VERTEX_SHADER, vertex_source)?;
    let fragment_shader = compile_shader(gl, Gl::FRAGMENT_SHADER, fragment_source)?;

    let program = gl
        .create_program()
        .ok_or_else(|| JsValue::from_str("Unable to create program"))?;

    gl.attach_shader(&program, &vertex_shader);
    gl.attach_shader(&program, &fragment_shader);
    gl.link_program(&program);

    if gl
        .get_program_parameter(&program, Gl::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(program)
    } else {
        let info = gl
            .get_program_info_log(&program)
            .unwrap_or_else(|| "Unknown program error".to_string());
        Err(JsValue::from_str(&info))
    }
}

fn create_webgl_context(canvas: &HtmlCanvasElement) -> Result<Gl, JsValue> {
    let ctx = canvas
        .get_context("webgl")?
        .ok_or_else(|| JsValue::from_str("WebGL unavailable"))?;

    ctx.dyn_into::<Gl>()
        .map_err(|_| JsValue::from_str("WebGL context is not a WebGlRenderingContext"))
}

fn upload_quad(gl: &Gl, buffer: &WebGlBuffer, data: &[f32]) {
    let array = js_sys::Float32Array::from(data);
    gl.bind_buffer(Gl::ARRAY_BUFFER, Some(buffer));
    gl.buffer_data_with_array_buffer_view(Gl::ARRAY_BUFFER, &array, Gl::STATIC_DRAW);
}

fn upload_maze_texture(app: &App) -> Result<(), JsValue> {
    app.gl.bind_texture(Gl::TEXTURE_2D, Some(&app.texture));
    app.gl.pixel_storei(Gl::UNPACK_ALIGNMENT, 1);

    app.gl
        .tex_image_2d_with_i32_and_i32_and_i32_and_format_and_type_and_opt_u8_array(
            Gl::TEXTURE_2D,
            0,
            Gl::RGBA as i32,
            app.rasterizer.width_px() as i32,
            app.rasterizer.height_px() as i32,
            0,
            Gl::RGBA,
            Gl::UNSIGNED_BYTE,
            Some(app.rasterizer.pixels()),
        )?;

    Ok(())
}

fn present(app: &App) {
    let width = app.rasterizer.width_px() as u32;
    let height = app.rasterizer.height_px() as u32;

    if app.canvas.width() != width {
        app.canvas.set_width(width);
    }
    if app.canvas.height() != height {
        app.canvas.set_height(height);
    }
    app.gl.viewport(0, 0, width as i32, height as i32);

    // Some implementations reset state on canvas resize, so re-bind.
    app.gl.use_program(Some(&app.program));

    app.gl
        .bind_buffer(Gl::ARRAY_BUFFER, Some(&app.position_buffer));
    app.gl.enable_vertex_attrib_array(app.a_position);
    app.gl
        .vertex_attrib_pointer_with_i32(app.a_position, 2, Gl::FLOAT, false, 0, 0);

    app.gl
        .bind_buffer(Gl::ARRAY_BUFFER, Some(&app.tex_coord_buffer));
    app.gl.enable_vertex_attrib_array(app.a_tex_coord);
    app.gl
        .vertex_attrib_pointer_with_i32(app.a_tex_coord, 2, Gl::FLOAT, false, 0, 0);

    app.gl.active_texture(Gl::TEXTURE0);
    app.gl.bind_texture(Gl::TEXTURE_2D, Some(&app.texture));
    app.gl.uniform1i(Some(&app.u_texture), 0);

    app.gl.clear_color(1.0, 1.0, 1.0, 1.0);
    app.gl.clear(Gl::COLOR_BUFFER_BIT);
    app.gl.draw_arrays(Gl::TRIANGLE_STRIP, 0, 4);
}

fn regenerate(app: &mut App) -> Result<(), JsValue> {
    let total = now_ms();
    let request = read_request(&app.document)?;
    let seed = resolve_seed(request.seed);
    let mut rng = StdRng::seed_from_u64(seed);

    let started = now_ms();
    let mut maze = Maze::new(
        request.height,
        request.width,
        &mut rng,
        request.opposite_corners,
    )
    .map_err(|err| JsValue::from_str(&err.to_string()))?;
    generate(&mut maze, &mut rng);
    trace("generating maze", started);

    let path = if request.show_solution {
        let started = now_ms();
        let path = solve(&maze);
        trace("solving maze", started);
        Some(path)
    } else {
        None
    };

    let started = now_ms();
    app.rasterizer.render(&maze);
    trace("drawing maze", started);

    if let Some(path) = &path {
        let started = now_ms();
        app.rasterizer.render_path(path);
        trace("drawing solution", started);
    }

    upload_maze_texture(app)?;
    present(app);

    let label_text = if request.label {
        format!("{}x{} {:x}", maze.height(), maze.width(), seed)
    } else {
        String::new()
    };
    app.label.set_text_content(Some(&label_text));

    set_status(&app.status, "Ready");
    trace("total time", total);
    Ok(())
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();

    if let Err(err) = start_impl() {
        let message = format!("fatal: {}", js_value_to_string(&err));

        if let Some(win) = web_sys::window() {
            if let Some(doc) = win.document() {
                if let Some(status) = doc.get_element_by_id("status") {
                    status.set_text_content(Some(&message));
                }
            }
        }

        web_sys::console::error_1(&err);
    }
}

fn start_impl() -> Result<(), JsValue> {
    let win = window();
    let document = win.document().expect("missing document");

    let canvas = document
        .get_element_by_id("mazeCanvas")
        .ok_or_else(|| JsValue::from_str("Missing canvas"))?
        .dyn_into::<HtmlCanvasElement>()?;

    let generate_button = document
        .get_element_by_id("generateButton")
        .ok_or_else(|| JsValue::from_str("Missing generate button"))?
        .dyn_into::<HtmlButtonElement>()?;

    let status = document
        .get_element_by_id("status")
        .ok_or_else(|| JsValue::from_str("Missing status line"))?
        .dyn_into::<HtmlElement>()?;

    let label = document
        .get_element_by_id("mazeLabel")
        .ok_or_else(|| JsValue::from_str("Missing maze label"))?
        .dyn_into::<HtmlElement>()?;

    let gl = create_webgl_context(&canvas)?;
    let program = create_program(&gl, VERTEX_SHADER_SOURCE, FRAGMENT_SHADER_SOURCE)?;
    gl.use_program(Some(&program));

    let a_position = gl.get_attrib_location(&program, "a_position");
    if a_position < 0 {
        return Err(JsValue::from_str("Missing a_position attribute"));
    }
    let a_position = a_position as u32;

    let a_tex_coord = gl.get_attrib_location(&program, "a_texCoord");
    if a_tex_coord < 0 {
        return Err(JsValue::from_str("Missing a_texCoord attribute"));
    }
    let a_tex_coord = a_tex_coord as u32;

    let u_texture = gl
        .get_uniform_location(&program, "u_texture")
        .ok_or_else(|| JsValue::from_str("Missing u_texture uniform"))?;

    // The quad never changes: the canvas is resized to the pixel buffer, so
    // the texture always maps edge to edge.
    let position_buffer = gl
        .create_buffer()
        .ok_or_else(|| JsValue::from_str("Unable to create position buffer"))?;
    upload_quad(
        &gl,
        &position_buffer,
        &[-1.0, 1.0, 1.0, 1.0, -1.0, -1.0, 1.0, -1.0],
    );

    let tex_coord_buffer = gl
        .create_buffer()
        .ok_or_else(|| JsValue::from_str("Unable to create tex coord buffer"))?;
    upload_quad(
        &gl,
        &tex_coord_buffer,
        &[0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 1.0],
    );

    let texture = gl
        .create_texture()
        .ok_or_else(|| JsValue::from_str("Unable to create texture"))?;
    gl.bind_texture(Gl::TEXTURE_2D, Some(&texture));
    gl.tex_parameteri(Gl::TEXTURE_2D, Gl::TEXTURE_WRAP_S, Gl::CLAMP_TO_EDGE as i32);
    gl.tex_parameteri(Gl::TEXTURE_2D, Gl::TEXTURE_WRAP_T, Gl::CLAMP_TO_EDGE as i32);
    gl.tex_parameteri(Gl::TEXTURE_2D, Gl::TEXTURE_MIN_FILTER, Gl::NEAREST as i32);
    gl.tex_parameteri(Gl::TEXTURE_2D, Gl::TEXTURE_MAG_FILTER, Gl::NEAREST as i32);

    let app = Rc::new(RefCell::new(App {
        gl,
        program,
        position_buffer,
        tex_coord_buffer,
        texture,
        a_position,
        a_tex_coord,
        u_texture,
        canvas,
        status,
        label,
        document,
        rasterizer: Rasterizer::new(),
    }));

    set_status(&app.borrow().status, "Ready");

    let app_click = Rc::clone(&app);
    let on_generate = Closure::wrap(Box::new(move |event: Event| {
        event.prevent_default();

        let mut app = app_click.borrow_mut();
        if let Err(err) = regenerate(&mut app) {
            let message = format!("Error: {}", js_value_to_string(&err));
            set_status(&app.status, &message);
            web_sys::console::error_1(&err);
        }
    }) as Box<dyn FnMut(_)>);

    generate_button
        .add_event_listener_with_callback("click", on_generate.as_ref().unchecked_ref())?;
    on_generate.forget();

    Ok(())
}
