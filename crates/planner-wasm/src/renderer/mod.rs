//! Rendererモジュール
//!
//! WebGPUを使用したレンダリング機能を提供

mod depth;
mod gpu_context;
mod scene_pipeline;

use gpu_context::GpuContext;

use std::collections::HashMap;

use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

use crate::utils::console_log;

use planner_core::{MeshId, MeshRef, ModelUniform, Ray, Transform, World};
use glam::Vec2;
use planner_renderer::{Camera, MeshLibrary};

use scene_pipeline::{GpuMesh, ScenePipeline};

/// 背景色（明るいグレー）
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.82,
    g: 0.85,
    b: 0.88,
    a: 1.0,
};

/// Renderer構造体
pub struct Renderer {
    ctx: GpuContext,
    scene: ScenePipeline,

    pub camera: Camera,

    #[allow(dead_code)]
    depth_texture: wgpu::Texture,
    depth_view: wgpu::TextureView,

    // MeshLibraryと同期するGPUバッファ
    meshes: HashMap<MeshId, GpuMesh>,
}

impl Renderer {
    /// 新しいRendererを作成（非同期）
    pub async fn create(canvas: HtmlCanvasElement, camera: Camera) -> Result<Renderer, JsValue> {
        let ctx = GpuContext::new(canvas).await?;

        let mut camera = camera;
        camera.set_aspect(ctx.aspect());

        let scene = ScenePipeline::new(&ctx, bytemuck::bytes_of(&camera.uniform()));
        let (depth_texture, depth_view) = depth::create_texture(&ctx.device, ctx.width(), ctx.height());

        console_log!("Renderer initialized successfully");

        Ok(Self {
            ctx,
            scene,
            camera,
            depth_texture,
            depth_view,
            meshes: HashMap::new(),
        })
    }

    /// Canvas サイズ変更
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.ctx.resize(width, height);

        let (depth_texture, depth_view) = depth::create_texture(&self.ctx.device, width, height);
        self.depth_texture = depth_texture;
        self.depth_view = depth_view;

        self.camera.set_aspect(width as f32 / height as f32);
        log::debug!("resized to {}x{}", width, height);
    }

    pub fn width(&self) -> u32 {
        self.ctx.width()
    }

    pub fn height(&self) -> u32 {
        self.ctx.height()
    }

    /// スクリーン座標（CSSピクセル基準ではなくcanvas解像度基準）からレイを生成
    pub fn screen_to_ray(&self, screen_x: f32, screen_y: f32) -> Ray {
        let viewport = Vec2::new(self.width() as f32, self.height() as f32);
        self.camera.screen_to_ray(Vec2::new(screen_x, screen_y), viewport)
    }

    /// 未転送のメッシュをアップロードし、ライブラリから消えたものを解放
    fn sync_meshes(&mut self, library: &MeshLibrary, world: &World) {
        self.meshes.retain(|id, _| library.contains(*id));

        for (_, &MeshRef(id)) in world.iter_with::<MeshRef>() {
            if self.meshes.contains_key(&id) {
                continue;
            }
            if let Some(mesh) = library.get(id) {
                let gpu_mesh = self.scene.upload(&self.ctx, mesh);
                self.meshes.insert(id, gpu_mesh);
            }
        }
    }

    /// WorldのMeshRefを持つ全Entityをレンダリング
    pub fn render_world(&mut self, world: &World, library: &MeshLibrary) -> Result<(), JsValue> {
        self.sync_meshes(library, world);

        let draws: Vec<(MeshId, ModelUniform)> = world
            .iter_with::<MeshRef>()
            .filter_map(|(entity, &MeshRef(id))| {
                let transform = world.get::<Transform>(entity)?;
                Some((id, ModelUniform::from_transform(transform)))
            })
            .collect();

        let output = self
            .ctx
            .surface
            .get_current_texture()
            .map_err(|e| JsValue::from_str(&format!("Failed to get surface texture: {:?}", e)))?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        self.ctx
            .queue
            .write_buffer(&self.scene.camera_buffer, 0, bytemuck::bytes_of(&self.camera.uniform()));

        // 各メッシュが自分のモデルバッファを持つので1パスで描ける
        for (id, uniform) in &draws {
            if let Some(gpu_mesh) = self.meshes.get(id) {
                self.ctx
                    .queue
                    .write_buffer(&gpu_mesh.model_buffer, 0, bytemuck::bytes_of(uniform));
            }
        }

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Scene Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_pipeline(&self.scene.pipeline);
            render_pass.set_bind_group(0, &self.scene.camera_bind_group, &[]);

            for (id, _) in &draws {
                let Some(gpu_mesh) = self.meshes.get(id) else {
                    continue;
                };
                render_pass.set_bind_group(1, &gpu_mesh.model_bind_group, &[]);
                render_pass.set_vertex_buffer(0, gpu_mesh.vertex_buffer.slice(..));
                render_pass.set_index_buffer(gpu_mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..gpu_mesh.num_indices, 0, 0..1);
            }
        }

        self.ctx.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}
